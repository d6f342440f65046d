//! Mesh construction utilities.
//!
//! Conversions between [`Mesh`] and the indexed face-vertex lists commonly
//! found in mesh file formats, plus welding of coincident corners.

use nalgebra::Point3;

use super::index::{Corner, VertexKey};
use super::soup::Mesh;
use crate::error::{MeshError, Result};

impl Mesh {
    /// Build a mesh from vertices and triangle faces.
    ///
    /// Each face becomes one triangle. Corners that reference the same vertex
    /// index are attached to each other.
    ///
    /// # Arguments
    /// * `vertices` - List of vertex positions
    /// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
    ///
    /// # Example
    /// ```
    /// use ferox_mesh::mesh::{Corner, Mesh};
    /// use nalgebra::Point3;
    ///
    /// let vertices = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    ///     Point3::new(1.0, 1.0, 0.0),
    /// ];
    /// let faces = vec![[0, 1, 2], [1, 3, 2]];
    ///
    /// let mesh = Mesh::from_indexed(&vertices, &faces).unwrap();
    /// let t: Vec<_> = mesh.triangles().collect();
    /// assert_eq!(mesh.len(), 2);
    /// assert!(mesh.is_connected(t[0], Corner::B, t[1], Corner::A).unwrap());
    /// ```
    pub fn from_indexed(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Result<Mesh> {
        for (fi, face) in faces.iter().enumerate() {
            for &vi in face {
                if vi >= vertices.len() {
                    return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
                }
            }
            if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
                return Err(MeshError::DegenerateFace { face: fi });
            }
        }

        let mut mesh = Mesh::builder().capacity(faces.len()).build()?;

        // first corner seen for each vertex index
        let mut first: Vec<Option<VertexKey>> = vec![None; vertices.len()];

        for face in faces {
            let t = mesh.add_triangle();
            for (corner, &vi) in Corner::ALL.into_iter().zip(face) {
                let key = t.vertex(corner);
                mesh.set_key_position(key, &vertices[vi]);
                match first[vi] {
                    Some(shared) => mesh.attach_keys(shared, key),
                    None => first[vi] = Some(key),
                }
            }
        }

        Ok(mesh)
    }

    /// Attach every pair of live corners whose positions lie within `tolerance`.
    ///
    /// Returns the number of corners that ended up connected to at least one
    /// other corner by this call.
    ///
    /// # Errors
    /// [`MeshError::InvalidParameter`] if `tolerance` is negative or not finite.
    pub fn weld(&mut self, tolerance: f64) -> Result<usize> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(MeshError::invalid_param(
                "tolerance",
                tolerance,
                "must be finite and non-negative",
            ));
        }

        let mut corners: Vec<(VertexKey, Point3<f64>)> = Vec::with_capacity(self.len() * 3);
        for t in self.triangles() {
            for corner in Corner::ALL {
                let key = t.vertex(corner);
                corners.push((key, self.key_position(key)));
            }
        }

        // sweep along x: only corners within `tolerance` in x can match
        corners.sort_by(|a, b| a.1.x.total_cmp(&b.1.x));
        let tol_sq = tolerance * tolerance;
        let mut welded = vec![false; corners.len()];

        for i in 0..corners.len() {
            let (ki, pi) = corners[i];
            for j in i + 1..corners.len() {
                let (kj, pj) = corners[j];
                if pj.x - pi.x > tolerance {
                    break;
                }
                if (pj - pi).norm_squared() <= tol_sq {
                    self.attach_keys(ki, kj);
                    welded[i] = true;
                    welded[j] = true;
                }
            }
        }

        let count = welded.iter().filter(|&&w| w).count();
        log::debug!("welded {} corners (tolerance {})", count, tolerance);
        Ok(count)
    }
}

/// Convert a mesh to vertex and face lists.
///
/// Each connection set becomes one shared vertex, positioned at the first
/// member visited. Unconnected corners get their own vertex. Faces are listed
/// in ascending slot order.
pub fn to_face_vertex(mesh: &Mesh) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let mut vertex_of: Vec<Option<usize>> = vec![None; mesh.capacity() * 3];
    let mut vertices = Vec::new();
    let mut faces = Vec::with_capacity(mesh.len());

    for t in mesh.triangles() {
        let mut face = [0; 3];
        for (slot, corner) in Corner::ALL.into_iter().enumerate() {
            let key = t.vertex(corner);
            face[slot] = match vertex_of[key.index()] {
                Some(v) => v,
                None => {
                    let v = vertices.len();
                    vertices.push(mesh.key_position(key));
                    vertex_of[key.index()] = Some(v);
                    for other in mesh.connected_keys(key) {
                        vertex_of[other.index()] = Some(v);
                    }
                    v
                }
            };
        }
        faces.push(face);
    }

    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(1.5, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [1, 3, 2]];
        (vertices, faces)
    }

    #[test]
    fn test_from_indexed_connects_shared_vertices() {
        let (vertices, faces) = two_triangles();
        let mesh = Mesh::from_indexed(&vertices, &faces).unwrap();
        let t: Vec<_> = mesh.triangles().collect();

        assert_eq!(mesh.len(), 2);
        assert!(mesh.is_connected(t[0], Corner::B, t[1], Corner::A).unwrap());
        assert!(mesh.is_connected(t[0], Corner::C, t[1], Corner::C).unwrap());
        assert!(mesh.connected(t[0], Corner::A).unwrap().is_empty());
        assert_eq!(mesh.position(t[1], Corner::B).unwrap(), vertices[3]);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, faces) = two_triangles();
        let mesh = Mesh::from_indexed(&vertices, &faces).unwrap();
        let (v2, f2) = to_face_vertex(&mesh);

        assert_eq!(v2, vertices);
        assert_eq!(f2, faces);
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        let faces = vec![[0, 1, 2]];

        let result = Mesh::from_indexed(&vertices, &faces);
        assert!(matches!(
            result,
            Err(MeshError::InvalidVertexIndex { face: 0, vertex: 2 })
        ));
    }

    #[test]
    fn test_degenerate_face() {
        let (vertices, _) = two_triangles();
        let faces = vec![[0, 1, 2], [3, 3, 2]];

        let result = Mesh::from_indexed(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::DegenerateFace { face: 1 })));
    }

    #[test]
    fn test_weld_coincident_corners() {
        let mut mesh = Mesh::new();
        let t0 = mesh.add_triangle();
        let t1 = mesh.add_triangle();
        mesh.set_positions(
            t0,
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        mesh.set_positions(
            t1,
            &Point3::new(1.0, 0.0, 1e-9),
            &Point3::new(1.0, 1.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
        )
        .unwrap();

        let welded = mesh.weld(1e-6).unwrap();

        assert_eq!(welded, 4);
        assert!(mesh.is_connected(t0, Corner::B, t1, Corner::A).unwrap());
        assert!(mesh.is_connected(t0, Corner::C, t1, Corner::C).unwrap());
        assert!(mesh.connected(t0, Corner::A).unwrap().is_empty());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_weld_rejects_negative_tolerance() {
        let mut mesh = Mesh::new();
        assert!(matches!(
            mesh.weld(-1.0),
            Err(MeshError::InvalidParameter { name: "tolerance", .. })
        ));
    }
}
