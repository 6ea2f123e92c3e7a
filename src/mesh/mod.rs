//! `Mesh` struct and implementations of the `CSGOps` trait for `Mesh`

use crate::float_types::{
    EPSILON, Real,
    parry3d::{
        bounding_volume::{Aabb, BoundingVolume},
        math::Isometry,
        query::{Ray, RayCast},
        shape::Triangle,
    },
};
use crate::traits::CSGOps;
use nalgebra::{Matrix4, Point3, Vector3};
use std::sync::OnceLock;

pub mod bsp;
pub mod plane;
pub mod polygon;
pub mod vertex;

use bsp::Node;
use polygon::Polygon;

/// A closed solid described by its boundary polygons.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// 3D polygons for volumetric shapes
    pub polygons: Vec<Polygon>,

    /// Lazily calculated AABB that spans `polygons`.
    pub bounding_box: OnceLock<Aabb>,
}

impl Mesh {
    /// Build a Mesh from an existing polygon list
    pub fn from_polygons(polygons: &[Polygon]) -> Self {
        Mesh {
            polygons: polygons.to_vec(),
            bounding_box: OnceLock::new(),
        }
    }

    fn from_polygon_vec(polygons: Vec<Polygon>) -> Self {
        Mesh {
            polygons,
            bounding_box: OnceLock::new(),
        }
    }

    /// `true` if the mesh has no polygons.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Triangulate each polygon in the Mesh returning a Mesh containing triangles
    pub fn triangulate(&self) -> Mesh {
        let triangles = self
            .polygons
            .iter()
            .flat_map(|poly| {
                poly.triangulate()
                    .into_iter()
                    .map(move |tri| Polygon::with_plane(tri.to_vec(), poly.plane.clone()))
            })
            .collect();
        Mesh::from_polygon_vec(triangles)
    }

    /// Number of triangles the mesh tessellates into.
    pub fn triangle_count(&self) -> usize {
        self.polygons
            .iter()
            .map(|p| p.vertices.len().saturating_sub(2))
            .sum()
    }

    /// Enclosed volume, by the divergence theorem over the boundary triangles.
    ///
    /// Only meaningful for closed, consistently oriented meshes.
    pub fn volume(&self) -> Real {
        self.polygons.iter().map(Polygon::signed_volume).sum()
    }

    /// Casts a ray defined by `origin` + t * `direction` against all triangles
    /// of this mesh and returns a list of (intersection_point, distance),
    /// sorted by ascending distance.
    ///
    /// Hits closer together than [`EPSILON`] are reported once, so a ray through a
    /// shared edge counts as a single crossing.
    pub fn ray_intersections(
        &self,
        origin: &Point3<Real>,
        direction: &Vector3<Real>,
    ) -> Vec<(Point3<Real>, Real)> {
        let ray = Ray::new(*origin, *direction);
        let iso = Isometry::identity();

        let mut hits = Vec::new();
        for poly in &self.polygons {
            for [a, b, c] in poly.triangulate() {
                let triangle = Triangle::new(a.pos, b.pos, c.pos);
                if let Some(hit) = triangle.cast_ray_and_get_normal(&iso, &ray, Real::MAX, true) {
                    let point_on_ray = ray.point_at(hit.time_of_impact);
                    hits.push((point_on_ray, hit.time_of_impact));
                }
            }
        }

        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits.dedup_by(|a, b| (a.1 - b.1).abs() < EPSILON);
        hits
    }

    /// Parity test: is `point` inside this (closed) mesh?
    ///
    /// The ray direction is not axis aligned, so it does not run
    /// along the faces of boxes and cylinders.
    pub fn contains_point(&self, point: &Point3<Real>) -> bool {
        let direction = Vector3::new(0.5773, 0.4173, 0.7018);
        self.ray_intersections(point, &direction).len() % 2 == 1
    }
}

impl CSGOps for Mesh {
    /// Returns a new empty Mesh
    fn new() -> Self {
        Mesh::default()
    }

    /// Return a new Mesh representing union of the two Meshes.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    fn union(&self, other: &Mesh) -> Mesh {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() || !self.bounding_box().intersects(&other.bounding_box()) {
            let mut polygons = self.polygons.clone();
            polygons.extend_from_slice(&other.polygons);
            return Mesh::from_polygon_vec(polygons);
        }

        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());

        Mesh::from_polygon_vec(a.all_polygons())
    }

    /// Return a new Mesh representing difference of the two Meshes.
    ///
    /// ```text
    /// let c = a.difference(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn difference(&self, other: &Mesh) -> Mesh {
        if self.is_empty()
            || other.is_empty()
            || !self.bounding_box().intersects(&other.bounding_box())
        {
            return self.clone();
        }

        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());
        a.invert();

        Mesh::from_polygon_vec(a.all_polygons())
    }

    /// Return a new Mesh representing intersection of the two Meshes.
    fn intersection(&self, other: &Mesh) -> Mesh {
        if self.is_empty()
            || other.is_empty()
            || !self.bounding_box().intersects(&other.bounding_box())
        {
            return Mesh::new();
        }

        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(&b.all_polygons());
        a.invert();

        Mesh::from_polygon_vec(a.all_polygons())
    }

    /// Apply an arbitrary invertible 3D transform (as a 4x4 matrix) to the mesh.
    ///
    /// A singular matrix collapses the solid; the mesh is returned unchanged.
    fn transform(&self, mat: &Matrix4<Real>) -> Mesh {
        let Some(inverse) = mat.try_inverse() else {
            tracing::warn!("ignoring non-invertible transform");
            return self.clone();
        };
        let normal_mat = inverse.transpose();
        let mirrored = mat.fixed_view::<3, 3>(0, 0).determinant() < 0.0;

        let mut mesh = Mesh::from_polygons(&self.polygons);
        for poly in &mut mesh.polygons {
            for vert in &mut poly.vertices {
                vert.transform(mat, &normal_mat);
            }
            if mirrored {
                // a reflection reverses winding; restore outward orientation
                poly.vertices.reverse();
            }
            poly.recompute_plane();
        }
        mesh
    }

    /// Returns an [`Aabb`] indicating the 3D bounds of all `polygons`.
    fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);

            for v in self.polygons.iter().flat_map(|p| p.vertices.iter()) {
                mins = mins.inf(&v.pos);
                maxs = maxs.sup(&v.pos);
            }

            // no polygons: a trivial AABB at the origin
            if mins.x > maxs.x {
                return Aabb::new(Point3::origin(), Point3::origin());
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Invert this Mesh (flip inside vs. outside)
    fn inverse(&self) -> Mesh {
        let mut mesh = Mesh::from_polygons(&self.polygons);
        for p in &mut mesh.polygons {
            p.flip();
        }
        mesh
    }
}
