//! 2D profiles on the XY plane and their extrusion into solids.

use crate::errors::{ValidationError, ensure_positive};
use crate::float_types::{Real, TAU};
use crate::mesh::{Mesh, polygon::Polygon, vertex::Vertex};
use geo::orient::Direction;
use geo::{Area, Coord, LineString, Orient, Polygon as GeoPolygon};
use nalgebra::{Point3, Vector3};

/// A simple, convex 2D outline on the XY plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub geometry: GeoPolygon<Real>,
}

impl Profile {
    /// Regular `segments`-gon inscribed in a circle of `radius` centered at the origin.
    ///
    /// The first vertex lies on +X.
    pub fn circle(radius: Real, segments: usize) -> Result<Self, ValidationError> {
        ensure_positive("radius", radius)?;
        if segments < 3 {
            return Err(ValidationError::TooFewSegments(segments));
        }

        let coords: Vec<Coord<Real>> = (0..segments)
            .map(|i| {
                let theta = TAU * i as Real / segments as Real;
                Coord {
                    x: radius * theta.cos(),
                    y: radius * theta.sin(),
                }
            })
            .collect();
        Ok(Self::from_ring(coords))
    }

    /// Axis-aligned rectangle of `width` x `length` centered at the origin.
    pub fn rectangle(width: Real, length: Real) -> Result<Self, ValidationError> {
        ensure_positive("width", width)?;
        ensure_positive("length", length)?;
        let (hx, hy) = (width / 2.0, length / 2.0);
        Ok(Self::from_ring(vec![
            Coord { x: -hx, y: -hy },
            Coord { x: hx, y: -hy },
            Coord { x: hx, y: hy },
            Coord { x: -hx, y: hy },
        ]))
    }

    fn from_ring(coords: Vec<Coord<Real>>) -> Self {
        // Polygon::new closes the ring; orient() makes the exterior counter-clockwise
        let geometry = GeoPolygon::new(LineString::new(coords), vec![]).orient(Direction::Default);
        Profile { geometry }
    }

    /// Enclosed area of the outline.
    pub fn area(&self) -> Real {
        self.geometry.unsigned_area()
    }

    /// Ring points without the closing duplicate, counter-clockwise.
    fn ring(&self) -> Vec<Point3<Real>> {
        let exterior = &self.geometry.exterior().0;
        let open = match (exterior.first(), exterior.last()) {
            (Some(first), Some(last)) if exterior.len() > 1 && first == last => {
                &exterior[..exterior.len() - 1]
            },
            _ => &exterior[..],
        };
        open.iter().map(|c| Point3::new(c.x, c.y, 0.0)).collect()
    }

    /// Extrude the profile from z = 0 up to z = `height`.
    pub fn extrude(&self, height: Real) -> Result<Mesh, ValidationError> {
        ensure_positive("height", height)?;
        let ring = self.ring();
        let n = ring.len();
        let up = Vector3::new(0.0, 0.0, height);

        let mut polygons = Vec::with_capacity(n + 2);

        // bottom faces -Z, so walk the ring backwards
        polygons.push(Polygon::new(
            ring.iter()
                .rev()
                .map(|p| Vertex::new(*p, -Vector3::z()))
                .collect(),
        ));
        polygons.push(Polygon::new(
            ring.iter().map(|p| Vertex::new(p + up, Vector3::z())).collect(),
        ));

        for i in 0..n {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            let edge = b - a;
            let normal = Vector3::new(edge.y, -edge.x, 0.0).normalize();
            polygons.push(Polygon::new(vec![
                Vertex::new(a, normal),
                Vertex::new(b, normal),
                Vertex::new(b + up, normal),
                Vertex::new(a + up, normal),
            ]));
        }

        Ok(Mesh::from_polygons(&polygons))
    }
}
