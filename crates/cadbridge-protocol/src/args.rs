//! Typed argument records, one per operation.
//!
//! Records reject unknown keys so that a misspelt argument fails loudly
//! instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// A point in model space, written as `[x, y, z]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3 {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

impl Point3 {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The same point moved along +Z.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "coordinate offset")]
    pub fn above(self, dz: f64) -> Self {
        Self::new(self.x, self.y, self.z + dz)
    }

    /// Whether every coordinate is finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Euclidean distance to `other`.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "Euclidean norm")]
    pub fn distance(self, other: Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Point3> for [f64; 3] {
    fn from(point: Point3) -> Self {
        [point.x, point.y, point.z]
    }
}

/// Arguments of `create_beam`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBeamArgs {
    /// Start of the beam axis.
    pub p1: Point3,
    /// End of the beam axis.
    pub p2: Point3,
    /// Orientation point fixing the height direction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p3: Option<Point3>,
    /// Cross-section width.
    pub width: f64,
    /// Cross-section height.
    pub height: f64,
    /// Element name; the host picks one when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CreateBeamArgs {
    /// Beam along `p1 -> p2` with the given cross-section.
    #[must_use]
    pub fn new(p1: Point3, p2: Point3, width: f64, height: f64) -> Self {
        Self {
            p1,
            p2,
            p3: None,
            width,
            height,
            name: None,
        }
    }

    /// Sets the orientation point.
    #[must_use]
    pub fn with_orientation(mut self, p3: Point3) -> Self {
        self.p3 = Some(p3);
        self
    }

    /// Sets the element name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Orientation point, defaulting to one unit above `p1`.
    #[must_use]
    pub fn orientation(&self) -> Point3 {
        self.p3.unwrap_or_else(|| self.p1.above(1.0))
    }

    /// Checks the scalar arguments.
    ///
    /// Geometric degeneracy such as coincident points is left to the host,
    /// which reports it as invalid geometry.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidArguments` for non-finite coordinates
    /// or a width or height that is not strictly positive.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        let points = [Some(self.p1), Some(self.p2), self.p3];
        if points.iter().flatten().any(|point| !point.is_finite()) {
            return Err(ProtocolError::invalid_arguments(
                "point coordinates must be finite",
            ));
        }
        for (label, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ProtocolError::invalid_arguments(format!(
                    "{label} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Arguments of operations addressing a single element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementIdArgs {
    /// Target element identifier.
    #[serde(alias = "id")]
    pub element_id: i64,
}

/// Arguments of operations that take none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoArgs {}
