//! PLY (Stanford polygon) format support.
//!
//! Point clouds are read from the `vertex` element alone, so files without
//! faces are accepted by [`load_points`]. Files are written as ASCII.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Ply, Property};

use crate::error::{MeshError, Result};
use crate::mesh::{to_face_vertex, Mesh};

fn read(path: &Path) -> Result<Ply<DefaultElement>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let parser = Parser::<DefaultElement>::new();
    parser.read_ply(&mut reader).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn load_error(path: &Path, message: &str) -> MeshError {
    MeshError::LoadError {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

fn vertices(path: &Path, ply: &Ply<DefaultElement>) -> Result<Vec<Point3<f64>>> {
    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error(path, "PLY file has no vertex element"))?;

    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let x = get_float_property(vertex, "x")
            .ok_or_else(|| load_error(path, "vertex missing x coordinate"))?;
        let y = get_float_property(vertex, "y")
            .ok_or_else(|| load_error(path, "vertex missing y coordinate"))?;
        let z = get_float_property(vertex, "z")
            .ok_or_else(|| load_error(path, "vertex missing z coordinate"))?;
        vertices.push(Point3::new(x, y, z));
    }
    Ok(vertices)
}

/// Load the vertex positions of a PLY file as a point cloud.
///
/// # Example
///
/// ```no_run
/// use ferox_mesh::io::ply;
///
/// let points = ply::load_points("bunny.ply").unwrap();
/// ```
pub fn load_points<P: AsRef<Path>>(path: P) -> Result<Vec<Point3<f64>>> {
    let path = path.as_ref();
    let ply = read(path)?;
    vertices(path, &ply)
}

/// Load a PLY file as a triangle soup.
///
/// Polygons are fan-triangulated. Corners that share a vertex index in the
/// file are connected.
pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let ply = read(path)?;
    let vertices = vertices(path, &ply)?;

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error(path, "PLY file has no face element"))?;

    let mut faces: Vec<[usize; 3]> = Vec::with_capacity(face_element.len());
    for face in face_element {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| load_error(path, "face missing vertex_indices property"))?;

        if indices.len() >= 3 {
            for i in 1..indices.len() - 1 {
                faces.push([indices[0], indices[i], indices[i + 1]]);
            }
        }
    }

    Mesh::from_indexed(&vertices, &faces)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Save vertices and triangles to a PLY file (ASCII format).
///
/// The face element is written even when `faces` is empty.
pub fn save_indexed<P: AsRef<Path>>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    // Write header
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by ferox")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "element face {}", faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for v in vertices {
        writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
    }
    for f in faces {
        writeln!(writer, "3 {} {} {}", f[0], f[1], f[2])?;
    }

    writer.flush()?;
    Ok(())
}

/// Save a point cloud to a PLY file (ASCII format).
///
/// # Example
///
/// ```no_run
/// use ferox_mesh::io::ply;
/// use nalgebra::Point3;
///
/// let points = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0)];
/// ply::save_points(&points, "points.ply").unwrap();
/// ```
pub fn save_points<P: AsRef<Path>>(points: &[Point3<f64>], path: P) -> Result<()> {
    save_indexed(points, &[], path)
}

/// Save a mesh to a PLY file (ASCII format).
///
/// Each connection set is written as one shared vertex.
pub fn save_mesh<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let (vertices, faces) = to_face_vertex(mesh);
    save_indexed(&vertices, &faces, path)
}
