//! Convex planar polygons, the unit the BSP kernel operates on.

use crate::float_types::Real;
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;

/// A convex polygon with a cached supporting plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vertex>,
    pub plane: Plane,
}

impl Polygon {
    /// Create a polygon from vertices in counter-clockwise order (seen from the front).
    pub fn new(vertices: Vec<Vertex>) -> Self {
        assert!(vertices.len() >= 3, "degenerate polygon");
        let plane = Plane::from_vertices(&vertices);
        Polygon { vertices, plane }
    }

    /// Create a polygon that shares an already known plane.
    pub(crate) fn with_plane(vertices: Vec<Vertex>, plane: Plane) -> Self {
        Polygon { vertices, plane }
    }

    /// Reverse winding, vertex normals and plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }

    /// Recompute the plane from the current vertex positions.
    pub fn recompute_plane(&mut self) {
        self.plane = Plane::from_vertices(&self.vertices);
    }

    /// Fan triangulation; valid because kernel polygons stay convex.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        let first = &self.vertices[0];
        self.vertices[1..]
            .windows(2)
            .map(|pair| [first.clone(), pair[0].clone(), pair[1].clone()])
            .collect()
    }

    /// Contribution of this polygon to the enclosed volume (divergence theorem).
    pub(crate) fn signed_volume(&self) -> Real {
        self.triangulate()
            .iter()
            .map(|[a, b, c]| a.pos.coords.dot(&b.pos.coords.cross(&c.pos.coords)) / 6.0)
            .sum()
    }
}
