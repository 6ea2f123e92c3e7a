use crate::float_types::{Real, tolerance};
use crate::io::IoError;
use crate::mesh::{Mesh, polygon::Polygon, vertex::Vertex};
use nalgebra::{Point3, Vector3};
use serde::Serialize;
use std::io::Cursor;
use std::path::Path;

/// Export to ASCII STL
/// Convert this Mesh to an **ASCII STL** string with the given `name`.
///
/// ```rust
/// # use insertcsg::mesh::Mesh;
/// let mesh = Mesh::cuboid(1.0, 1.0, 1.0).unwrap();
/// let text = insertcsg::io::stl::to_stl_ascii(&mesh, "my_solid");
/// assert!(text.starts_with("solid my_solid"));
/// ```
pub fn to_stl_ascii(mesh: &Mesh, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {name}\n"));

    for poly in &mesh.polygons {
        let n = poly.plane.normal();
        for tri in poly.triangulate() {
            out.push_str(&format!("  facet normal {:.6} {:.6} {:.6}\n", n.x, n.y, n.z));
            out.push_str("    outer loop\n");
            for v in &tri {
                let p = v.pos;
                out.push_str(&format!("      vertex {:.6} {:.6} {:.6}\n", p.x, p.y, p.z));
            }
            out.push_str("    endloop\n");
            out.push_str("  endfacet\n");
        }
    }

    out.push_str(&format!("endsolid {name}\n"));
    out
}

/// Export to BINARY STL (returns `Vec<u8>`)
///
/// Binary STL has no room for a solid name, so `_name` is only kept for
/// symmetry with [`to_stl_ascii`].
pub fn to_stl_binary(mesh: &Mesh, _name: &str) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let mut triangles = Vec::<Triangle>::with_capacity(mesh.triangle_count());
    for poly in &mesh.polygons {
        let n = poly.plane.normal();
        for tri in poly.triangulate() {
            triangles.push(Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: tri.map(|v| {
                    let p = v.pos;
                    Vertex::new([p.x as f32, p.y as f32, p.z as f32])
                }),
            });
        }
    }

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

/// Parse ASCII or binary STL bytes into an indexed mesh.
fn parse_stl(bytes: &[u8]) -> Result<stl_io::IndexedMesh, IoError> {
    let mut reader = Cursor::new(bytes);
    let indexed = stl_io::read_stl(&mut reader)
        .map_err(|e| IoError::MalformedInput(format!("not a readable STL file: {e}")))?;
    if indexed.faces.is_empty() {
        return Err(IoError::EmptyMesh);
    }
    Ok(indexed)
}

impl Mesh {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }

    pub fn to_stl_binary(&self, name: &str) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self, name)
    }

    /// Write this mesh to `path` as binary STL.
    pub fn write_stl(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        if self.is_empty() {
            return Err(IoError::EmptyMesh);
        }
        let name = path
            .as_ref()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("solid");
        let bytes = self.to_stl_binary(name)?;
        std::fs::write(path.as_ref(), bytes)?;
        Ok(())
    }

    /// Read a Mesh from ASCII or binary STL bytes, one polygon per facet.
    ///
    /// Facets whose three corners are collinear are skipped.
    pub fn from_stl(bytes: &[u8]) -> Result<Mesh, IoError> {
        let indexed = parse_stl(bytes)?;
        let point = |i: usize| {
            let v = indexed.vertices[i];
            Point3::new(v[0] as Real, v[1] as Real, v[2] as Real)
        };

        let polygons: Vec<Polygon> = indexed
            .faces
            .iter()
            .filter_map(|face| {
                let [a, b, c] = face.vertices.map(point);
                let normal = (b - a).cross(&(c - a));
                if normal.norm() <= tolerance() {
                    return None;
                }
                let normal: Vector3<Real> = normal.normalize();
                Some(Polygon::new(vec![
                    Vertex::new(a, normal),
                    Vertex::new(b, normal),
                    Vertex::new(c, normal),
                ]))
            })
            .collect();

        Ok(Mesh::from_polygons(&polygons))
    }
}

/// Summary of an STL payload, reported to viewer clients after upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshStats {
    pub triangles: usize,
    pub vertices: usize,
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl MeshStats {
    /// Parse `bytes` as STL and summarize it; fails on anything that is not STL.
    pub fn from_stl(bytes: &[u8]) -> Result<MeshStats, IoError> {
        let indexed = parse_stl(bytes)?;
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for v in &indexed.vertices {
            for axis in 0..3 {
                if !v[axis].is_finite() {
                    return Err(IoError::MalformedInput(format!(
                        "vertex coordinate {} is not finite",
                        v[axis]
                    )));
                }
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        Ok(MeshStats {
            triangles: indexed.faces.len(),
            vertices: indexed.vertices.len(),
            min,
            max,
        })
    }

    /// Length of the bounding-box diagonal.
    pub fn diagonal(&self) -> f32 {
        (0..3)
            .map(|axis| (self.max[axis] - self.min[axis]).powi(2))
            .sum::<f32>()
            .sqrt()
    }
}
