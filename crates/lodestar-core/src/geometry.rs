//! Geometric primitives for 3D graph layout.
//!
//! This module provides the vector type used for node positions, forces and
//! velocities throughout Lodestar, plus the [`Axis`] selector used by
//! axis-mapped layouts.
//!
//! # Overview
//!
//! - [`Vec3`] - A 3D vector in layout space
//! - [`Axis`] - One of the three layout axes
//!
//! # Coordinate System
//!
//! Lodestar uses a right-handed, Y-up coordinate system matching WebXR:
//!
//! ```text
//!        +Y
//!         │
//!         │
//!         └──────► +X
//!        ╱
//!       ╱
//!     +Z
//! ```
//!
//! - **Y-axis**: "up". Vertical ordering constraints act on this axis.
//! - **X/Z plane**: the horizontal "floor". Circular and ring placements lie in it.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 3D vector representing a position, force or velocity in layout space.
///
/// `Vec3` uses `f32` components and provides the handful of vector operations
/// the simulation needs. All operations return new values.
///
/// # Examples
///
/// ```
/// # use lodestar_core::geometry::Vec3;
/// let a = Vec3::new(1.0, 2.0, 2.0);
/// let b = Vec3::new(1.0, 0.0, 0.0);
///
/// assert_eq!(a.length(), 3.0);
/// assert_eq!(a.sub_vec(b), Vec3::new(0.0, 2.0, 2.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    x: f32,
    y: f32,
    z: f32,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Creates a new vector with the specified components
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Returns the x component
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y component
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns the z component
    pub fn z(self) -> f32 {
        self.z
    }

    /// Returns the component along `axis`
    pub fn component(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Returns a vector with only the `axis` component set to `value`
    pub fn along(axis: Axis, value: f32) -> Self {
        match axis {
            Axis::X => Self::new(value, 0.0, 0.0),
            Axis::Y => Self::new(0.0, value, 0.0),
            Axis::Z => Self::new(0.0, 0.0, value),
        }
    }

    /// Creates a new vector with the specified y component
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Checks if all components are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// Checks if all components are finite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Adds another vector to this one, returning a new vector
    pub fn add_vec(self, other: Vec3) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    /// Subtracts another vector from this one, returning a new vector
    pub fn sub_vec(self, other: Vec3) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    /// Multiplies all components by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }

    /// Returns the negated vector
    pub fn negated(self) -> Self {
        self.scale(-1.0)
    }

    /// Returns the Euclidean length of the vector
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns the squared Euclidean length of the vector
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns the Euclidean distance to another point
    pub fn distance(self, other: Vec3) -> f32 {
        self.sub_vec(other).length()
    }

    /// Projects the vector onto the horizontal (x/z) plane
    pub fn horizontal(self) -> Self {
        Self {
            x: self.x,
            y: 0.0,
            z: self.z,
        }
    }

    /// Returns the unit vector in the same direction, or `None` for a
    /// zero-length vector.
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        (len > f32::EPSILON).then(|| self.scale(1.0 / len))
    }

    /// Returns a point on the horizontal circle of `radius` around this
    /// point, at `angle` radians measured from the +X axis toward +Z.
    pub fn on_horizontal_circle(self, radius: f32, angle: f32) -> Self {
        Self {
            x: self.x + radius * angle.cos(),
            y: self.y,
            z: self.z + radius * angle.sin(),
        }
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// One of the three layout axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    /// Depth axis, the default time axis.
    #[default]
    Z,
}

/// Error returned when a string does not name an axis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown axis `{0}`, expected one of x, y, z")]
pub struct ParseAxisError(String);

impl FromStr for Axis {
    type Err = ParseAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            _ => Err(ParseAxisError(s.to_string())),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_vec3_new() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x(), 1.0);
        assert_eq!(v.y(), 2.0);
        assert_eq!(v.z(), 3.0);
    }

    #[test]
    fn test_vec3_default_is_zero() {
        assert!(Vec3::default().is_zero());
        assert_eq!(Vec3::default(), Vec3::ZERO);
    }

    #[test]
    fn test_vec3_add_sub() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, -1.0, 0.5);
        assert_eq!(a.add_vec(b), Vec3::new(5.0, 1.0, 3.5));
        assert_eq!(a.sub_vec(b), Vec3::new(-3.0, 3.0, 2.5));
    }

    #[test]
    fn test_vec3_length() {
        assert_eq!(Vec3::new(2.0, 3.0, 6.0).length(), 7.0);
        assert_eq!(Vec3::new(2.0, 3.0, 6.0).length_squared(), 49.0);
        assert_eq!(Vec3::new(0.0, 0.0, 1.0).distance(Vec3::new(0.0, 0.0, -1.0)), 2.0);
    }

    #[test]
    fn test_vec3_normalized() {
        let n = Vec3::new(0.0, 3.0, 4.0).normalized().unwrap();
        assert_approx_eq!(f32, n.length(), 1.0);
        assert_approx_eq!(f32, n.y(), 0.6);

        assert!(Vec3::ZERO.normalized().is_none());
    }

    #[test]
    fn test_vec3_axis_helpers() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.component(Axis::X), 1.0);
        assert_eq!(v.component(Axis::Y), 2.0);
        assert_eq!(v.component(Axis::Z), 3.0);
        assert_eq!(Vec3::along(Axis::Y, 5.0), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(v.horizontal(), Vec3::new(1.0, 0.0, 3.0));
        assert_eq!(v.with_y(-1.0), Vec3::new(1.0, -1.0, 3.0));
    }

    #[test]
    fn test_vec3_on_horizontal_circle() {
        let center = Vec3::new(1.0, 5.0, 1.0);

        let p0 = center.on_horizontal_circle(2.0, 0.0);
        assert_approx_eq!(f32, p0.x(), 3.0);
        assert_approx_eq!(f32, p0.y(), 5.0);
        assert_approx_eq!(f32, p0.z(), 1.0);

        let p1 = center.on_horizontal_circle(2.0, PI / 2.0);
        assert_approx_eq!(f32, p1.x(), 1.0, epsilon = 0.0001);
        assert_approx_eq!(f32, p1.z(), 3.0);
    }

    #[test]
    fn test_vec3_is_finite() {
        assert!(Vec3::new(1.0, 2.0, 3.0).is_finite());
        assert!(!Vec3::new(f32::NAN, 0.0, 0.0).is_finite());
        assert!(!Vec3::new(0.0, f32::INFINITY, 0.0).is_finite());
    }

    #[test]
    fn test_axis_from_str() {
        assert_eq!("x".parse::<Axis>(), Ok(Axis::X));
        assert_eq!(" Y ".parse::<Axis>(), Ok(Axis::Y));
        assert_eq!("z".parse::<Axis>(), Ok(Axis::Z));
        assert!("w".parse::<Axis>().is_err());
        assert_eq!(Axis::default(), Axis::Z);
        assert_eq!(Axis::X.to_string(), "x");
    }
}
