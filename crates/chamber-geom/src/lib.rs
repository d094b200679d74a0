//! Minimal geometry types for the chamber crates (integer grid math, the
//! six-direction vocabulary, and the 90°-quantized facing algebra).
#![forbid(unsafe_code)]

mod facing;
mod rotate;

pub use facing::{Direction, Facing, FacingError};
pub use rotate::{rotate, unrotate};

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use thiserror::Error;

/// A point on the integer voxel grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Point3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Point3 {
    pub const ZERO: Point3 = Point3 { x: 0, y: 0, z: 0 };
    pub const ONE: Point3 = Point3 { x: 1, y: 1, z: 1 };
    pub const UNIT_X: Point3 = Point3 { x: 1, y: 0, z: 0 };
    pub const UNIT_Y: Point3 = Point3 { x: 0, y: 1, z: 0 };
    pub const UNIT_Z: Point3 = Point3 { x: 0, y: 0, z: 1 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Largest absolute component (the Chebyshev distance from the origin).
    #[inline]
    pub fn chebyshev(self) -> i32 {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }
}

impl Add for Point3 {
    type Output = Point3;
    #[inline]
    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Point3 {
    #[inline]
    fn add_assign(&mut self, rhs: Point3) {
        *self = *self + rhs;
    }
}

impl Sub for Point3 {
    type Output = Point3;
    #[inline]
    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Point3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Point3) {
        *self = *self - rhs;
    }
}

impl Neg for Point3 {
    type Output = Point3;
    #[inline]
    fn neg(self) -> Point3 {
        Point3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<i32> for Point3 {
    type Output = Point3;
    #[inline]
    fn mul(self, rhs: i32) -> Point3 {
        Point3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

/// Error parsing a `"x y z"` coordinate string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("coordinates must be of the form \"x y z\": {0:?}")]
pub struct ParsePointError(pub String);

impl FromStr for Point3 {
    type Err = ParsePointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let mut next = || -> Result<i32, ParsePointError> {
            parts
                .next()
                .and_then(|p| p.parse().ok())
                .ok_or_else(|| ParsePointError(s.to_string()))
        };
        let (x, y, z) = (next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(ParsePointError(s.to_string()));
        }
        Ok(Point3::new(x, y, z))
    }
}

/// A fractional offset within a voxel cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

// Components print with at most three decimals and no trailing zeros,
// matching the persisted offset encoding.
fn fmt_component(v: f32) -> String {
    let mut s = format!("{:.3}", v);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            fmt_component(self.x),
            fmt_component(self.y),
            fmt_component(self.z)
        )
    }
}

impl FromStr for Vec3 {
    type Err = ParsePointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let mut next = || -> Result<f32, ParsePointError> {
            parts
                .next()
                .and_then(|p| p.parse().ok())
                .ok_or_else(|| ParsePointError(s.to_string()))
        };
        let (x, y, z) = (next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(ParsePointError(s.to_string()));
        }
        Ok(Vec3::new(x, y, z))
    }
}
