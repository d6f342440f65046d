//! Core mesh data structures.
//!
//! This module provides the adjacency mesh: a triangle soup whose corners can
//! be declared coincident with each other.
//!
//! # Overview
//!
//! The primary type is [`Mesh`]. Triangles do not share vertices; every
//! triangle owns three corners with their own position and attribute data.
//! Which corners belong together is recorded separately, as connection sets
//! of [`VertexKey`]s stored in fixed-size pages (see [`PAGE_CAPACITY`]).
//! A corner may belong to at most one set.
//!
//! # Handles
//!
//! - [`Triangle`] - Identifies a triangle; rejected once the triangle is removed
//! - [`Corner`] - Names one of the three corners of a triangle
//! - [`TriangleEdge`] - Names one of the three directed edges of a triangle
//! - [`VertexKey`] - A specific corner of a specific triangle
//!
//! # Construction
//!
//! ```
//! use ferox_mesh::mesh::{Corner, Mesh};
//!
//! let mut mesh = Mesh::new();
//! let t1 = mesh.add_triangle();
//! let t2 = mesh.add_triangle();
//!
//! mesh.attach_vertex(t1, Corner::A, t2, Corner::B).unwrap();
//!
//! let around = mesh.connected(t1, Corner::A).unwrap();
//! assert_eq!(around.get(&t2), Some(&Corner::B));
//! ```

mod attribute;
mod builder;
mod connection;
mod index;
mod soup;
mod triangle;

pub use attribute::{AttributeId, AttributeSchema, MeshBuilder, MAX_ATTRIBUTE_SIZE};
pub use builder::to_face_vertex;
pub use connection::{ConnectionStats, PAGE_CAPACITY};
pub use index::{Corner, Triangle, TriangleEdge, VertexKey};
pub use soup::{Mesh, Triangles};
pub use triangle::TriangleCursor;
