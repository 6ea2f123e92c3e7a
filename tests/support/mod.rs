//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use insertcsg::{
    CSGOps,
    float_types::{Real, TAU},
    mesh::Mesh,
};
use nalgebra::{Point3, Vector3};

/// Returns the bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]` of a mesh.
pub fn bounding_box(mesh: &Mesh) -> [Real; 6] {
    let aabb = mesh.bounding_box();
    [
        aabb.mins.x,
        aabb.mins.y,
        aabb.mins.z,
        aabb.maxs.x,
        aabb.maxs.y,
        aabb.maxs.z,
    ]
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Area of a regular `segments`-gon inscribed in a circle of `radius`.
pub fn polygon_area(radius: Real, segments: usize) -> Real {
    0.5 * segments as Real * radius * radius * (TAU / segments as Real).sin()
}

/// Distance from `origin` to the first surface hit along `direction`.
pub fn first_hit(mesh: &Mesh, origin: Point3<Real>, direction: Vector3<Real>) -> Option<Real> {
    mesh.ray_intersections(&origin, &direction)
        .first()
        .map(|(_, distance)| *distance)
}
