//! The nested key/value record tree puzzle files are built from, and the
//! quoted text grammar that carries it.
//!
//! A node has a string key and an ordered list of children; each child is
//! either another node or a (key, value) property. Values are kept verbatim
//! as written in the file, escapes included.
#![forbid(unsafe_code)]

mod text;

pub use text::{read_tree, write_tree};

use chamber_geom::{Point3, Vec3};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("line {line}: node opening brace found within a node body")]
    StrayBrace { line: usize },

    #[error("line {line}: invalid line: {text:?}")]
    InvalidLine { line: usize, text: String },

    #[error("line {line}: expected '{{' to open node {key:?}")]
    MissingBrace { line: usize, key: String },

    #[error("unexpected end of input inside node {key:?}")]
    UnclosedNode { key: String },

    #[error("line {line}: value opened here is never terminated")]
    UnterminatedValue { line: usize },

    #[error("empty input")]
    Empty,

    #[error("node {node:?} is missing property {key:?}")]
    MissingProperty { node: String, key: String },

    #[error("property {key:?} has invalid value {value:?}")]
    InvalidValue { key: String, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    Node(Node),
    Property(Property),
}

/// A keyed node with ordered children.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub key: String,
    pub entries: Vec<Entry>,
}

impl Node {
    pub fn new(key: impl Into<String>) -> Node {
        Node {
            key: key.into(),
            entries: Vec::new(),
        }
    }

    pub fn push_node(&mut self, node: Node) {
        self.entries.push(Entry::Node(node));
    }

    pub fn push_property(&mut self, property: Property) {
        self.entries.push(Entry::Property(property));
    }

    /// First child node with the given key.
    pub fn node(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Node(n) if n.key == key => Some(n),
            _ => None,
        })
    }

    /// All child nodes with the given key, in order.
    pub fn nodes<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Node> {
        self.entries.iter().filter_map(move |entry| match entry {
            Entry::Node(n) if n.key == key => Some(n),
            _ => None,
        })
    }

    /// First property with the given key.
    pub fn property(&self, key: &str) -> Option<&Property> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Property(p) if p.key == key => Some(p),
            _ => None,
        })
    }

    /// Like `property`, but a missing key is an error.
    pub fn require(&self, key: &str) -> Result<&Property, TreeError> {
        self.property(key).ok_or_else(|| TreeError::MissingProperty {
            node: self.key.clone(),
            key: key.to_string(),
        })
    }
}

/// A (key, value) leaf. The value is the raw file text between the quotes.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: String,
}

impl Property {
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Property {
        Property {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn int(key: impl Into<String>, value: i32) -> Property {
        Property::text(key, value.to_string())
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Property {
        Property::text(key, if value { "1" } else { "0" })
    }

    pub fn float(key: impl Into<String>, value: f64) -> Property {
        Property::text(key, format!("{value:.6}"))
    }

    /// Unix seconds, persisted as zero-padded hex.
    pub fn timestamp(key: impl Into<String>, seconds: i64) -> Property {
        Property::text(key, format!("0x{seconds:016X}"))
    }

    pub fn point(key: impl Into<String>, value: Point3) -> Property {
        Property::text(key, value.to_string())
    }

    pub fn vec3(key: impl Into<String>, value: Vec3) -> Property {
        Property::text(key, value.to_string())
    }

    pub fn as_i32(&self) -> Result<i32, TreeError> {
        self.value.parse().map_err(|_| self.invalid())
    }

    /// `"1"` is true, anything else false.
    pub fn as_bool(&self) -> bool {
        self.value == "1"
    }

    pub fn as_f64(&self) -> Result<f64, TreeError> {
        self.value.parse().map_err(|_| self.invalid())
    }

    pub fn as_timestamp(&self) -> Result<i64, TreeError> {
        let digits = self.value.strip_prefix("0x").unwrap_or(&self.value);
        i64::from_str_radix(digits, 16).map_err(|_| self.invalid())
    }

    pub fn as_point(&self) -> Result<Point3, TreeError> {
        self.value.parse().map_err(|_| self.invalid())
    }

    pub fn as_vec3(&self) -> Result<Vec3, TreeError> {
        self.value.parse().map_err(|_| self.invalid())
    }

    fn invalid(&self) -> TreeError {
        TreeError::InvalidValue {
            key: self.key.clone(),
            value: self.value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_property_encodings() {
        assert_eq!(Property::bool("Solid", true).value, "1");
        assert_eq!(Property::bool("Solid", false).value, "0");
        assert_eq!(Property::float("CompileTime", 15.0).value, "15.000000");
        assert_eq!(
            Property::timestamp("Timestamp_Created", 0x4F2E_77A1).value,
            "0x000000004F2E77A1"
        );
        assert_eq!(
            Property::point("Position", Point3::new(3, -1, 2)).value,
            "3 -1 2"
        );
    }

    #[test]
    fn typed_property_decodings() {
        assert_eq!(Property::text("A", "42").as_i32(), Ok(42));
        assert!(Property::text("A", "fortytwo").as_i32().is_err());
        assert!(!Property::text("A", "0").as_bool());
        assert_eq!(
            Property::text("T", "0x000000004F2E77A1").as_timestamp(),
            Ok(0x4F2E_77A1)
        );
        assert_eq!(
            Property::text("P", "1 2 3").as_point(),
            Ok(Point3::new(1, 2, 3))
        );
    }

    #[test]
    fn require_reports_the_node_key() {
        let node = Node::new("Item");
        let err = node.require("Type").unwrap_err();
        assert_eq!(
            err,
            TreeError::MissingProperty {
                node: "Item".into(),
                key: "Type".into()
            }
        );
    }
}
