//! Point cloud and mesh file I/O.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load points | Load mesh | Save points | Save mesh |
//! |--------|-----------|-------------|-----------|-------------|-----------|
//! | PLY | `.ply` | ✓ | ✓ | ✓ | ✓ |
//! | STL | `.stl` | ✓ | ✓ | ✗ | ✓ |
//!
//! # Usage
//!
//! ```no_run
//! use ferox_mesh::algo::hull::ConvexHull;
//! use ferox_mesh::io::{load_points, save_points};
//!
//! let cloud = load_points("scan.ply").unwrap();
//! let hull = ConvexHull::construct(&cloud).unwrap();
//! save_points(hull.points(), "hull.ply").unwrap();
//! ```

pub mod ply;
pub mod stl;

use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::Mesh;

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// PLY (Stanford polygon) format.
    Ply,
    /// STL (stereolithography) format.
    Stl,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "ply" => Some(Format::Ply),
            "stl" => Some(Format::Stl),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a point cloud with automatic format detection.
pub fn load_points<P: AsRef<Path>>(path: P) -> Result<Vec<Point3<f64>>> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Ply => ply::load_points(path),
        Format::Stl => stl::load_points(path),
    }
}

/// Load a triangle soup with automatic format detection.
pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Ply => ply::load_mesh(path),
        Format::Stl => stl::load_mesh(path),
    }
}

/// Save a point cloud with automatic format detection.
pub fn save_points<P: AsRef<Path>>(points: &[Point3<f64>], path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Ply => ply::save_points(points, path),
        Format::Stl => Err(MeshError::SaveError {
            path: path.to_path_buf(),
            message: "STL cannot store a point cloud".to_string(),
        }),
    }
}

/// Save a mesh with automatic format detection.
pub fn save_mesh<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Ply => ply::save_mesh(mesh, path),
        Format::Stl => stl::save_mesh(mesh, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b/cloud.PLY"), Some(Format::Ply));
        assert_eq!(Format::from_path("part.stl"), Some(Format::Stl));
        assert_eq!(Format::from_path("model.obj"), None);
        assert_eq!(Format::from_path("noext"), None);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            load_points("model.obj"),
            Err(MeshError::UnsupportedFormat { ref extension }) if extension == "obj"
        ));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloud.stl");
        assert!(matches!(
            save_points(&[Point3::origin()], &path),
            Err(MeshError::SaveError { .. })
        ));
    }
}
