//! Line-oriented reader and writer for the quoted tree grammar.
//!
//! ```text
//! "node_key"
//! {
//!     "prop_key"      "value"
//!     "child"
//!     {
//!     }
//! }
//! ```
//!
//! Quotes inside values are escaped with a backslash; a value whose closing
//! quote is not found on the same line continues across lines, joined with
//! newlines after per-line trimming.

use crate::{Node, Property, TreeError};

struct Cursor<'a> {
    lines: std::str::Lines<'a>,
    line_no: usize,
}

impl<'a> Cursor<'a> {
    fn next(&mut self) -> Option<(usize, &'a str)> {
        let line = self.lines.next()?;
        self.line_no += 1;
        Some((self.line_no, line))
    }
}

/// Scans one quoted segment at the start of `s`. Returns the raw content
/// (escapes preserved) and the remainder after the closing quote, or `None`
/// when the closing quote is missing.
fn scan_quoted(s: &str) -> Option<(&str, &str)> {
    let rest = s.strip_prefix('"')?;
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => return Some((&rest[..i], &rest[i + 1..])),
            _ => {}
        }
    }
    None
}

/// Parses a tree from text. The first non-empty line must be the root key.
pub fn read_tree(input: &str) -> Result<Node, TreeError> {
    let mut cursor = Cursor {
        lines: input.lines(),
        line_no: 0,
    };

    let root_key = loop {
        let Some((line_no, raw)) = cursor.next() else {
            return Err(TreeError::Empty);
        };
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match scan_quoted(line) {
            Some((key, rest)) if rest.trim().is_empty() => break key.to_string(),
            _ => {
                return Err(TreeError::InvalidLine {
                    line: line_no,
                    text: line.to_string(),
                });
            }
        }
    };

    expect_open(&mut cursor, &root_key)?;
    let mut root = Node::new(root_key);
    read_body(&mut cursor, &mut root, true)?;
    Ok(root)
}

fn expect_open(cursor: &mut Cursor, key: &str) -> Result<(), TreeError> {
    loop {
        let Some((line_no, raw)) = cursor.next() else {
            return Err(TreeError::UnclosedNode {
                key: key.to_string(),
            });
        };
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line == "{" {
            return Ok(());
        }
        return Err(TreeError::MissingBrace {
            line: line_no,
            key: key.to_string(),
        });
    }
}

fn read_body(cursor: &mut Cursor, node: &mut Node, is_root: bool) -> Result<(), TreeError> {
    loop {
        let Some((line_no, raw)) = cursor.next() else {
            // The root body may simply run out of input.
            if is_root {
                return Ok(());
            }
            return Err(TreeError::UnclosedNode {
                key: node.key.clone(),
            });
        };
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line == "{" {
            return Err(TreeError::StrayBrace { line: line_no });
        }
        if line == "}" {
            return Ok(());
        }

        let Some((key, rest)) = scan_quoted(line) else {
            return Err(TreeError::InvalidLine {
                line: line_no,
                text: line.to_string(),
            });
        };
        let rest = rest.trim_start();

        if rest.is_empty() {
            expect_open(cursor, key)?;
            let mut child = Node::new(key);
            read_body(cursor, &mut child, false)?;
            node.push_node(child);
        } else if rest.starts_with('"') {
            let value = read_value(cursor, rest, line_no)?;
            node.push_property(Property::text(key, value));
        } else {
            return Err(TreeError::InvalidLine {
                line: line_no,
                text: line.to_string(),
            });
        }
    }
}

/// Reads a property value starting at `start` (which begins with `"`),
/// pulling further lines while the closing quote is missing.
fn read_value(cursor: &mut Cursor, start: &str, line_no: usize) -> Result<String, TreeError> {
    let mut acc = start.to_string();
    loop {
        if let Some((value, tail)) = scan_quoted(&acc) {
            if tail.trim().is_empty() {
                return Ok(value.to_string());
            }
            return Err(TreeError::InvalidLine {
                line: line_no,
                text: acc,
            });
        }
        let Some((_, raw)) = cursor.next() else {
            return Err(TreeError::UnterminatedValue { line: line_no });
        };
        acc.push('\n');
        acc.push_str(raw.trim());
    }
}

/// Writes a tree in the tab-indented text form.
pub fn write_tree(root: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, root, 0);
    out
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    push_indent(out, depth);
    out.push('"');
    out.push_str(&node.key);
    out.push_str("\"\n");
    push_indent(out, depth);
    out.push_str("{\n");

    for entry in &node.entries {
        match entry {
            crate::Entry::Node(child) => write_node(out, child, depth + 1),
            crate::Entry::Property(property) => {
                push_indent(out, depth + 1);
                out.push('"');
                out.push_str(&property.key);
                out.push_str("\"\t\t\"");
                out.push_str(&property.value);
                out.push_str("\"\n");
            }
        }
    }

    push_indent(out, depth);
    out.push_str("}\n");
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}
