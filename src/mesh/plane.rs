//! Oriented planes and the polygon classification / splitting the BSP tree runs on.

use crate::float_types::{EPSILON, Real};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};

// Classification bit flags; SPANNING == FRONT | BACK.
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// A plane `normal · p = w` with a unit normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vector3<Real>,
    pub w: Real,
}

/// The four buckets produced by [`Plane::split_polygon`]:
/// `(coplanar_front, coplanar_back, front, back)`.
pub type SplitResult = (Vec<Polygon>, Vec<Polygon>, Vec<Polygon>, Vec<Polygon>);

impl Plane {
    /// Create a plane from a (not necessarily unit) normal and an offset along it.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        let len = normal.norm();
        Plane {
            normal: normal / len,
            w: w / len,
        }
    }

    /// Plane through three points, normal following the right-hand rule.
    pub fn from_points(a: &Point3<Real>, b: &Point3<Real>, c: &Point3<Real>) -> Self {
        let n = (b - a).cross(&(c - a));
        if n.norm_squared() < Real::EPSILON * Real::EPSILON {
            return Plane {
                normal: Vector3::z(),
                w: a.z,
            };
        }
        let normal = n.normalize();
        Plane {
            normal,
            w: normal.dot(&a.coords),
        }
    }

    /// Best-fit plane of a (planar) vertex loop.
    ///
    /// Uses Newell's method so that nearly-collinear leading vertices do not
    /// produce a degenerate normal.
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        let n = vertices.len();
        if n < 3 {
            return Plane {
                normal: Vector3::z(),
                w: 0.0,
            };
        }

        let mut normal = Vector3::zeros();
        let mut centroid = Vector3::zeros();
        for (i, current) in vertices.iter().enumerate() {
            let next = &vertices[(i + 1) % n];
            let (c, nx) = (current.pos, next.pos);
            normal.x += (c.y - nx.y) * (c.z + nx.z);
            normal.y += (c.z - nx.z) * (c.x + nx.x);
            normal.z += (c.x - nx.x) * (c.y + nx.y);
            centroid += c.coords;
        }

        if normal.norm_squared() < Real::EPSILON * Real::EPSILON {
            return Self::from_points(&vertices[0].pos, &vertices[1].pos, &vertices[2].pos);
        }

        let normal = normal.normalize();
        let centroid = centroid / n as Real;
        Plane {
            normal,
            w: normal.dot(&centroid),
        }
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    /// Reverse the orientation of this plane.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Signed distance of `point` from the plane.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point as [`FRONT`], [`BACK`] or [`COPLANAR`].
    #[inline]
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let t = self.signed_distance(point);
        if t < -EPSILON {
            BACK
        } else if t > EPSILON {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Bitwise OR of the classification of every vertex of `polygon`.
    pub fn classify_polygon(&self, polygon: &Polygon) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(&v.pos))
    }

    /// Split `polygon` by this plane into coplanar-front, coplanar-back, front and back parts.
    ///
    /// Pieces of a spanning polygon keep the plane of their parent.
    pub fn split_polygon(&self, polygon: &Polygon) -> SplitResult {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let count = polygon.vertices.len();
                let mut split_front = Vec::with_capacity(count + 1);
                let mut split_back = Vec::with_capacity(count + 1);

                for i in 0..count {
                    let j = (i + 1) % count;
                    let (type_i, type_j) = (types[i], types[j]);
                    let (vi, vj) = (&polygon.vertices[i], &polygon.vertices[j]);

                    if type_i != BACK {
                        split_front.push(vi.clone());
                    }
                    if type_i != FRONT {
                        split_back.push(vi.clone());
                    }

                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vj.pos - vi.pos));
                        if denom.abs() > Real::EPSILON {
                            let t = (self.w - self.normal.dot(&vi.pos.coords)) / denom;
                            let v = vi.interpolate(vj, t);
                            split_front.push(v.clone());
                            split_back.push(v);
                        }
                    }
                }

                if split_front.len() >= 3 {
                    front.push(Polygon::with_plane(split_front, polygon.plane.clone()));
                }
                if split_back.len() >= 3 {
                    back.push(Polygon::with_plane(split_back, polygon.plane.clone()));
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }
}
