//! Core mesh data structures.
//!
//! This module provides the quad mesh representation and the pieces used to
//! construct it.
//!
//! # Overview
//!
//! The primary type is [`QuadMesh`], which stores vertices, edges and quad
//! faces with explicit incidence in both directions. Edges are not stored
//! as half-edge pairs; each edge lists the faces that share it.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`EdgeId`] - Identifies an edge
//! - [`FaceId`] - Identifies a face
//!
//! # Construction
//!
//! ```
//! use quadrille::mesh::{build_from_quads, cube};
//! use nalgebra::Point3;
//!
//! let cube = cube(1.0).unwrap();
//! assert!(cube.is_closed());
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let quad = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
//! assert!(!quad.is_closed());
//! ```

mod adjacency;
mod builder;
mod emitter;
mod index;
mod quad;

pub use adjacency::{resolve_adjacency, Adjacency, EdgeIdentity};
pub use builder::{
    build_base_mesh, build_from_quads, build_from_quads_with, cube, to_face_vertex, BaseShape,
};
pub use emitter::VertexEmitter;
pub use index::{EdgeId, FaceId, VertexId};
pub use quad::{quad_centroid, segment_midpoint, Edge, Face, QuadMesh, Vertex};
