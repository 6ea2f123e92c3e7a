use crate::float_types::Real;
use crate::float_types::parry3d::bounding_volume::Aabb;
use nalgebra::{Matrix4, Rotation3, Translation3, Unit, Vector3};

/// Boolean operations + transformations: the capability set the part builders rely on
pub trait CSGOps: Sized + Clone {
    fn new() -> Self;
    fn union(&self, other: &Self) -> Self;
    fn difference(&self, other: &Self) -> Self;
    fn intersection(&self, other: &Self) -> Self;
    fn transform(&self, matrix: &Matrix4<Real>) -> Self;
    fn bounding_box(&self) -> Aabb;
    fn inverse(&self) -> Self;

    /// Returns a new Self translated by vector.
    fn translate_vector(&self, vector: Vector3<Real>) -> Self {
        self.transform(&Translation3::from(vector).to_homogeneous())
    }

    /// Returns a new Self translated by x, y, and z.
    fn translate(&self, x: Real, y: Real, z: Real) -> Self {
        self.translate_vector(Vector3::new(x, y, z))
    }

    /// Returns a new Self translated so that its bounding-box center is at the origin.
    fn center(&self) -> Self {
        let aabb = self.bounding_box();
        let c = aabb.center();
        self.translate(-c.x, -c.y, -c.z)
    }

    /// Rotates by `angle_deg` about `axis` through the origin.
    ///
    /// A zero-length axis leaves the shape untouched.
    fn rotate_axis(&self, axis: Vector3<Real>, angle_deg: Real) -> Self {
        let Some(axis) = Unit::try_new(axis, Real::EPSILON) else {
            return self.clone();
        };
        let rot = Rotation3::from_axis_angle(&axis, angle_deg.to_radians());
        self.transform(&rot.to_homogeneous())
    }
}
