//! STL (stereolithography) format support.
//!
//! Both binary and ASCII files are read. Files are written as binary.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{Corner, Mesh};

fn read(path: &Path) -> Result<stl_io::IndexedMesh> {
    let mut file = File::open(path)?;
    stl_io::read_stl(&mut file).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn point(v: &stl_io::Vertex) -> Point3<f64> {
    Point3::new(v[0] as f64, v[1] as f64, v[2] as f64)
}

/// Load the distinct vertex positions of an STL file as a point cloud.
pub fn load_points<P: AsRef<Path>>(path: P) -> Result<Vec<Point3<f64>>> {
    let stl = read(path.as_ref())?;
    Ok(stl.vertices.iter().map(point).collect())
}

/// Load an STL file as a triangle soup.
///
/// Corners at the same stored vertex are connected. Triangles that use one
/// vertex twice are skipped.
///
/// # Example
///
/// ```no_run
/// use ferox_mesh::io::stl;
///
/// let mesh = stl::load_mesh("part.stl").unwrap();
/// println!("{} triangles", mesh.len());
/// ```
pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let stl = read(path.as_ref())?;
    let vertices: Vec<Point3<f64>> = stl.vertices.iter().map(point).collect();
    let faces: Vec<[usize; 3]> = stl
        .faces
        .iter()
        .map(|tri| tri.vertices)
        .filter(|[a, b, c]| a != b && b != c && a != c)
        .collect();

    Mesh::from_indexed(&vertices, &faces)
}

/// Save a mesh to a binary STL file.
pub fn save_mesh<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let mut triangles: Vec<stl_io::Triangle> = Vec::with_capacity(mesh.len());
    let mut cursor = mesh.cursor();
    while cursor.advance() {
        let [p0, p1, p2] = cursor.positions();
        let n = (p1 - p0).cross(&(p2 - p0));
        let n = if n.norm() > 0.0 { n.normalize() } else { n };
        let vertex = |p: Point3<f64>| stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32]);

        triangles.push(stl_io::Triangle {
            normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
            vertices: [vertex(p0), vertex(p1), vertex(p2)],
        });
    }

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}
