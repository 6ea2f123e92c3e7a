//! Primitive solids the part builders start from.

use crate::errors::ValidationError;
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::sketch::Profile;
use crate::traits::CSGOps;

impl Mesh {
    /// Box of `width` x `length` x `height` centered at the origin.
    pub fn cuboid(width: Real, length: Real, height: Real) -> Result<Mesh, ValidationError> {
        let slab = Profile::rectangle(width, length)?.extrude(height)?;
        Ok(slab.translate(0.0, 0.0, -height / 2.0))
    }

    /// Cylinder along +Z standing on the XY plane (z in `[0, height]`).
    pub fn cylinder(radius: Real, height: Real, segments: usize) -> Result<Mesh, ValidationError> {
        Profile::circle(radius, segments)?.extrude(height)
    }
}
