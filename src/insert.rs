//! Cylindrical inserts: a cylinder with a concentric blind hole drilled from its top face.
//!
//! The same part serves as a table leg and as a heat-set insert socket. Building
//! an insert keeps two solids around: the hollowed body that ends up in the
//! part, and the plain outer cylinder used to clear room for it.

use crate::errors::{ValidationError, ensure_positive};
use crate::float_types::{DEFAULT_SEGMENTS, Real, TAU};
use crate::mesh::Mesh;
use crate::traits::CSGOps;
use serde::{Deserialize, Serialize};

/// How far the hole tool pokes out above the top face, so the cut never
/// relies on two coincident caps.
const HOLE_OVERSHOOT: Real = 1.0;

/// Dimensions of a cylindrical insert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsertDimensions {
    /// Outer diameter of the cylinder
    pub diameter: Real,
    /// Diameter of the blind hole
    pub hole_diameter: Real,
    /// Depth of the blind hole, measured from the top face
    pub hole_depth: Real,
    /// Total height of the cylinder
    pub height: Real,
}

impl InsertDimensions {
    pub const fn new(diameter: Real, hole_diameter: Real, hole_depth: Real, height: Real) -> Self {
        Self {
            diameter,
            hole_diameter,
            hole_depth,
            height,
        }
    }

    /// Reject dimensions that cannot describe a blind hole inside a cylinder.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive("diameter", self.diameter)?;
        ensure_positive("hole diameter", self.hole_diameter)?;
        ensure_positive("hole depth", self.hole_depth)?;
        ensure_positive("height", self.height)?;
        if self.hole_diameter >= self.diameter {
            return Err(ValidationError::HoleTooWide {
                hole: self.hole_diameter,
                body: self.diameter,
            });
        }
        if self.hole_depth > self.height {
            return Err(ValidationError::HoleTooDeep {
                depth: self.hole_depth,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// The two solids of a built insert.
#[derive(Debug, Clone)]
pub struct InsertSolids {
    /// Cylinder minus hole
    pub body: Mesh,
    /// Unhollowed cylinder, used as a clearance cutter
    pub outer_body: Mesh,
}

/// A cylindrical insert whose solids are realized by [`CylindricalInsert::create`].
#[derive(Debug, Clone)]
pub struct CylindricalInsert {
    dimensions: InsertDimensions,
    segments: usize,
    solids: Option<InsertSolids>,
}

impl CylindricalInsert {
    /// Validated insert using [`DEFAULT_SEGMENTS`] per circle.
    pub fn new(
        diameter: Real,
        hole_diameter: Real,
        hole_depth: Real,
        height: Real,
    ) -> Result<Self, ValidationError> {
        Self::from_dimensions(
            InsertDimensions::new(diameter, hole_diameter, hole_depth, height),
            DEFAULT_SEGMENTS,
        )
    }

    pub fn from_dimensions(
        dimensions: InsertDimensions,
        segments: usize,
    ) -> Result<Self, ValidationError> {
        dimensions.validate()?;
        if segments < 3 {
            return Err(ValidationError::TooFewSegments(segments));
        }
        Ok(Self {
            dimensions,
            segments,
            solids: None,
        })
    }

    pub const fn dimensions(&self) -> &InsertDimensions {
        &self.dimensions
    }

    pub const fn segments(&self) -> usize {
        self.segments
    }

    pub const fn diameter(&self) -> Real {
        self.dimensions.diameter
    }

    pub const fn height(&self) -> Real {
        self.dimensions.height
    }

    pub const fn is_created(&self) -> bool {
        self.solids.is_some()
    }

    /// Build both solids. Calling it again returns the solids already built.
    pub fn create(&mut self) -> Result<&Mesh, ValidationError> {
        let solids = match self.solids.take() {
            Some(solids) => solids,
            None => self.build()?,
        };
        Ok(&self.solids.insert(solids).body)
    }

    fn build(&self) -> Result<InsertSolids, ValidationError> {
        let InsertDimensions {
            diameter,
            hole_diameter,
            hole_depth,
            height,
        } = self.dimensions;

        let cylinder = Mesh::cylinder(diameter / 2.0, height, self.segments)?;
        let hole = Mesh::cylinder(hole_diameter / 2.0, hole_depth + HOLE_OVERSHOOT, self.segments)?
            .translate(0.0, 0.0, height - hole_depth);

        let body = cylinder.difference(&hole);
        tracing::debug!(
            diameter,
            hole_diameter,
            hole_depth,
            height,
            polygons = body.polygons.len(),
            "built cylindrical insert"
        );

        Ok(InsertSolids {
            body,
            outer_body: cylinder,
        })
    }

    /// Hollowed solid, once created.
    pub fn body(&self) -> Option<&Mesh> {
        self.solids.as_ref().map(|s| &s.body)
    }

    /// Unhollowed solid, once created.
    pub fn outer_body(&self) -> Option<&Mesh> {
        self.solids.as_ref().map(|s| &s.outer_body)
    }

    pub fn solids(&self) -> Option<&InsertSolids> {
        self.solids.as_ref()
    }

    /// Volume of the hollowed solid as tessellated with this insert's segment count.
    pub fn expected_volume(&self) -> Real {
        let d = &self.dimensions;
        let area = |diameter: Real| polygon_area(diameter / 2.0, self.segments);
        area(d.diameter) * d.height - area(d.hole_diameter) * d.hole_depth
    }
}

/// Area of a regular `segments`-gon inscribed in a circle of `radius`.
pub fn polygon_area(radius: Real, segments: usize) -> Real {
    0.5 * segments as Real * radius * radius * (TAU / segments as Real).sin()
}
