//! Error types for texatlas.
//!
//! Most failures inside the unwrap pipeline are local to one island or chart
//! and are logged and skipped by the orchestrator. The variants here are what
//! individual stages report before that happens.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building or unwrapping a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh (or mesh fragment) has no faces or no vertices.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A per-face attribute list is not parallel to the face list.
    #[error("{attribute} has {actual} entries but the mesh has {expected} faces")]
    AttributeLength {
        /// Name of the attribute ("normals", "partitions").
        attribute: &'static str,
        /// Number of faces in the mesh.
        expected: usize,
        /// Number of entries supplied.
        actual: usize,
    },

    /// The fragment has no boundary edge, so it cannot be mapped to a disk.
    #[error("mesh fragment has no boundary")]
    NoBoundary,

    /// A boundary walk reached a vertex with no outgoing boundary edge.
    #[error("boundary loop is not closed at vertex {vertex}")]
    OpenBoundary {
        /// The vertex where the walk stopped.
        vertex: usize,
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MeshError::InvalidVertexIndex { face: 3, vertex: 42 };
        assert_eq!(err.to_string(), "face 3 references invalid vertex index 42");

        let err = MeshError::AttributeLength {
            attribute: "normals",
            expected: 12,
            actual: 11,
        };
        assert_eq!(err.to_string(), "normals has 11 entries but the mesh has 12 faces");

        let err = MeshError::invalid_param("texel_size_per_unit", -1.0, "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid parameter: texel_size_per_unit = -1 (must be positive)"
        );
    }
}
