//! Geometry algorithms.
//!
//! - **Convex hull**: gift wrapping of point clouds, with a divide-and-wrap
//!   front end for large inputs ([`hull`])
//!
//! Long-running algorithms accept a [`Progress`] callback.

pub mod hull;
pub mod progress;

pub use progress::Progress;
