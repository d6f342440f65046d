//! # Ferox Mesh
//!
//! Triangle soups with explicit corner adjacency, and convex hulls of point
//! clouds.
//!
//! ## Features
//!
//! - **Adjacency mesh**: triangles own their corners; coincidence between
//!   corners is an explicit relation stored in a paged free-list arena
//! - **Generational handles**: removed triangles are rejected, even after
//!   their slot is reused
//! - **Per-corner attributes**: named float attributes of size 1 to 4
//! - **Convex hulls**: gift wrapping with a parallel divide-and-wrap front end
//! - **File formats**: PLY and STL
//!
//! ## Quick Start
//!
//! ```no_run
//! use ferox_mesh::prelude::*;
//!
//! // Hull of a scanned point cloud
//! let cloud = ferox_mesh::io::load_points("scan.ply").unwrap();
//! let hull = ConvexHull::construct(&cloud).unwrap();
//! println!("{} of {} points on the hull", hull.len(), cloud.len());
//!
//! // Save the hull surface
//! let mesh = hull.to_mesh().unwrap();
//! ferox_mesh::io::save_mesh(&mesh, "hull.stl").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use ferox_mesh::prelude::*;
//! use nalgebra::Point3;
//!
//! let mut mesh = Mesh::new();
//! let t1 = mesh.add_triangle();
//! let t2 = mesh.add_triangle();
//!
//! mesh.set_positions(
//!     t1,
//!     &Point3::new(0.0, 0.0, 0.0),
//!     &Point3::new(1.0, 0.0, 0.0),
//!     &Point3::new(0.0, 1.0, 0.0),
//! )
//! .unwrap();
//!
//! // t2 shares the edge B-C of t1
//! mesh.attach_vertex(t1, Corner::B, t2, Corner::A).unwrap();
//! mesh.attach_vertex(t1, Corner::C, t2, Corner::C).unwrap();
//! mesh.set_sticky_position(t1, Corner::B, &Point3::new(1.0, 0.0, 0.0)).unwrap();
//! mesh.set_sticky_position(t1, Corner::C, &Point3::new(0.0, 1.0, 0.0)).unwrap();
//! mesh.set_position(t2, Corner::B, &Point3::new(1.0, 1.0, 0.0)).unwrap();
//!
//! assert_eq!(mesh.position(t2, Corner::A).unwrap(), Point3::new(1.0, 0.0, 0.0));
//! assert_eq!(mesh.connected(t1, Corner::C).unwrap().len(), 1);
//! ```
//!
//! ## Removal
//!
//! ```
//! use ferox_mesh::prelude::*;
//!
//! let mut mesh = Mesh::new();
//! let t1 = mesh.add_triangle();
//! let t2 = mesh.add_triangle();
//! mesh.attach_vertex(t1, Corner::A, t2, Corner::A).unwrap();
//!
//! mesh.remove_triangle(t1).unwrap();
//!
//! // the stale handle is rejected and its corners are gone from every set
//! assert!(matches!(
//!     mesh.remove_triangle(t1),
//!     Err(MeshError::InvalidTriangle { .. })
//! ));
//! assert!(mesh.connected(t2, Corner::A).unwrap().is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use ferox_mesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::hull::{ConvexHull, HullOptions};
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        to_face_vertex, AttributeId, Corner, Mesh, Triangle, TriangleCursor, TriangleEdge,
        VertexKey,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
