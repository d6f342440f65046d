//! Error types for ferox-mesh.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh and hull operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A triangle handle does not belong to the mesh, or its slot was removed.
    #[error("triangle {index} does not belong to this mesh (foreign or already removed)")]
    InvalidTriangle {
        /// The slot index stored in the handle.
        index: usize,
    },

    /// A named attribute is not part of the mesh schema.
    #[error("unknown attribute: {name}")]
    UnknownAttribute {
        /// The attribute name.
        name: String,
    },

    /// An attribute was declared with an unsupported element size.
    #[error("attribute {name} has element size {size} (must be 1 to 4)")]
    InvalidAttributeSize {
        /// The attribute name.
        name: String,
        /// The rejected element size.
        size: usize,
    },

    /// An attribute name was declared twice.
    #[error("attribute {name} declared more than once")]
    DuplicateAttribute {
        /// The attribute name.
        name: String,
    },

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A point in the input cloud is unusable.
    #[error("point {index} is invalid: {reason}")]
    InvalidInput {
        /// Index of the offending point in the input.
        index: usize,
        /// Why the point was rejected.
        reason: &'static str,
    },

    /// The point cloud has too few distinct points for a 3D hull.
    #[error("convex hull needs at least 4 distinct points, found {found}")]
    NotEnoughPoints {
        /// Number of distinct points found.
        found: usize,
    },

    /// The point cloud does not span three dimensions.
    #[error("point cloud is degenerate (spans only {dimension} dimensions)")]
    DegeneratePointCloud {
        /// The affine dimension of the cloud (0, 1 or 2).
        dimension: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading data from file.
    #[error("failed to load from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving data to file.
    #[error("failed to save to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    pub(crate) fn unknown_attribute(name: &str) -> Self {
        MeshError::UnknownAttribute {
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = MeshError::InvalidTriangle { index: 7 };
        assert!(err.to_string().contains("triangle 7"));

        let err = MeshError::NotEnoughPoints { found: 3 };
        assert_eq!(
            err.to_string(),
            "convex hull needs at least 4 distinct points, found 3"
        );

        let err = MeshError::invalid_param("divisions", 0, "must be at least 2");
        assert_eq!(
            err.to_string(),
            "invalid parameter: divisions = 0 (must be at least 2)"
        );
    }
}
