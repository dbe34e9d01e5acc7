//! Error types for quadrille.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no faces.
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

    /// A face uses the same vertex more than once.
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A polygon read from input does not have exactly four corners.
    #[error("face {face} has {corners} corners, expected a quad")]
    NotQuad {
        /// The face index.
        face: usize,
        /// Number of corners found.
        corners: usize,
    },

    /// An edge is shared by more than two faces.
    #[error("edge {edge} ({v0}, {v1}) is shared by {faces} faces")]
    NonManifoldEdge {
        /// The edge index.
        edge: usize,
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
        /// Number of incident faces.
        faces: usize,
    },

    /// A face side was matched to an edge that joins different vertices.
    ///
    /// Only possible under midpoint edge identity, when two segments with
    /// distinct endpoints share a midpoint.
    #[error("side {side} of face {face} shares a midpoint with edge {edge} but not its endpoints")]
    MismatchedEdge {
        /// The face index.
        face: usize,
        /// The side within the face (0..4).
        side: usize,
        /// The edge the side was matched to.
        edge: usize,
    },

    /// An edge lies on an open boundary where a closed surface is required.
    #[error("edge {edge} ({v0}, {v1}) lies on an open boundary")]
    OpenBoundary {
        /// The edge index.
        edge: usize,
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
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

    pub(crate) fn load_error(path: &std::path::Path, message: impl Into<String>) -> Self {
        MeshError::LoadError {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}
