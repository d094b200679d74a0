//! World-space directions and the facing algebra.
//!
//! A facing is an ordered (normal, right) pair of non-parallel directions.
//! Rotation angles relate a facing to a per-item default frame; the mapping
//! between the two is precomputed over the whole 24-frame × 64-triple domain.

use std::collections::HashMap;
use std::sync::LazyLock;

use thiserror::Error;

use crate::rotate::{rotate, snap_angle};
use crate::Point3;

/// An axis-aligned world-space direction. The discriminants are the
/// persisted encoding: directions on the same axis differ by 3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    NegX = 0,
    NegY = 1,
    NegZ = 2,
    PosX = 3,
    PosY = 4,
    PosZ = 5,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::NegX,
        Direction::NegY,
        Direction::NegZ,
        Direction::PosX,
        Direction::PosY,
        Direction::PosZ,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// 0 for X, 1 for Y, 2 for Z.
    #[inline]
    pub fn axis(self) -> usize {
        self.index() % 3
    }

    /// Two directions are parallel iff they share an axis.
    #[inline]
    pub fn is_parallel_to(self, other: Direction) -> bool {
        self.axis() == other.axis()
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        Direction::ALL[(self.index() + 3) % 6]
    }

    /// The negative direction on the same axis.
    #[inline]
    pub fn negative(self) -> Direction {
        Direction::ALL[self.axis()]
    }

    pub fn unit(self) -> Point3 {
        match self {
            Direction::NegX => Point3::new(-1, 0, 0),
            Direction::NegY => Point3::new(0, -1, 0),
            Direction::NegZ => Point3::new(0, 0, -1),
            Direction::PosX => Point3::UNIT_X,
            Direction::PosY => Point3::UNIT_Y,
            Direction::PosZ => Point3::UNIT_Z,
        }
    }

    /// Cross product restricted to the six unit directions. Parallel inputs
    /// have no defined cross product and return `self` unchanged; callers
    /// rely on that no-op.
    pub fn cross(self, other: Direction) -> Direction {
        if self.is_parallel_to(other) {
            return self;
        }

        let a = self.unit();
        let b = other.unit();
        classify_unit(Point3::new(
            a.y * b.z - a.z * b.y,
            a.z * b.x - a.x * b.z,
            a.x * b.y - a.y * b.x,
        ))
    }
}

/// Classifies a unit vector by its first nonzero component.
fn classify_unit(p: Point3) -> Direction {
    if p.x != 0 {
        if p.x > 0 { Direction::PosX } else { Direction::NegX }
    } else if p.y != 0 {
        if p.y > 0 { Direction::PosY } else { Direction::NegY }
    } else if p.z > 0 {
        Direction::PosZ
    } else {
        Direction::NegZ
    }
}

/// A facing constructed from a parallel (normal, right) pair.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FacingError {
    #[error("normal {normal:?} and right {right:?} are parallel")]
    Parallel { normal: Direction, right: Direction },
}

/// A local orientation: the direction an item's face points (normal) and the
/// direction of its right edge. Never parallel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Facing {
    normal: Direction,
    right: Direction,
}

impl Facing {
    pub fn new(normal: Direction, right: Direction) -> Result<Facing, FacingError> {
        if normal.is_parallel_to(right) {
            return Err(FacingError::Parallel { normal, right });
        }
        Ok(Facing { normal, right })
    }

    #[inline]
    pub fn normal(self) -> Direction {
        self.normal
    }

    #[inline]
    pub fn right(self) -> Direction {
        self.right
    }

    /// The derived up axis, cross(right, normal).
    #[inline]
    pub fn up(self) -> Direction {
        self.right.cross(self.normal)
    }

    /// The facing reached by rotating `start` through `angles` (degrees,
    /// applied X then Y then Z). Angles quantize to the 90° lattice the same
    /// way [`rotate`] quantizes them.
    pub fn from_angles(start: Facing, angles: Point3) -> Facing {
        let key = Point3::new(
            snap_angle(angles.x),
            snap_angle(angles.y),
            snap_angle(angles.z),
        );
        *TABLES
            .end_frames
            .get(&(start, key))
            .expect("rotation tables cover every frame and snapped angle triple")
    }

    /// Some angle triple that rotates `start` onto `end`. The rotation
    /// mapping is many-to-one, so the result is one representative of a
    /// quotient class, not a canonical inverse; which one is fixed by the
    /// table's build order.
    pub fn angles_between(start: Facing, end: Facing) -> Point3 {
        *TABLES
            .angle_triples
            .get(&(start, end))
            .expect("every pair of frames is reachable by some angle triple")
    }
}

struct FacingTables {
    end_frames: HashMap<(Facing, Point3), Facing>,
    angle_triples: HashMap<(Facing, Facing), Point3>,
}

static TABLES: LazyLock<FacingTables> = LazyLock::new(build_tables);

/// A frame packed into one vector: the normal contributes a ±1 component and
/// the right a ±2 component, so the rotated vector classifies back into a
/// frame unambiguously.
fn frame_vector(facing: Facing) -> Point3 {
    facing.normal.unit() + facing.right.unit() * 2
}

fn classify_frame(p: Point3) -> Facing {
    let normal = if p.x.abs() == 1 {
        if p.x > 0 { Direction::PosX } else { Direction::NegX }
    } else if p.y.abs() == 1 {
        if p.y > 0 { Direction::PosY } else { Direction::NegY }
    } else if p.z > 0 {
        Direction::PosZ
    } else {
        Direction::NegZ
    };

    let right = if p.x.abs() == 2 {
        if p.x > 0 { Direction::PosX } else { Direction::NegX }
    } else if p.y.abs() == 2 {
        if p.y > 0 { Direction::PosY } else { Direction::NegY }
    } else if p.z > 0 {
        Direction::PosZ
    } else {
        Direction::NegZ
    };

    Facing { normal, right }
}

fn build_tables() -> FacingTables {
    let mut end_frames = HashMap::new();
    let mut angle_triples = HashMap::new();

    for normal in Direction::ALL {
        for right in Direction::ALL {
            if normal.is_parallel_to(right) {
                continue;
            }
            let start = Facing { normal, right };
            let start_vec = frame_vector(start);

            for x in 0..4 {
                for y in 0..4 {
                    for z in 0..4 {
                        let angles = Point3::new(x * 90 - 90, y * 90 - 90, z * 90 - 90);
                        let end = classify_frame(rotate(start_vec, angles));
                        end_frames.insert((start, angles), end);
                        // Many triples reach the same end frame; the first
                        // one in x→y→z order wins.
                        angle_triples.entry((start, end)).or_insert(angles);
                    }
                }
            }
        }
    }

    FacingTables {
        end_frames,
        angle_triples,
    }
}
