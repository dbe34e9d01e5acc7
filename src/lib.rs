//! # Quadrille
//!
//! Quad mesh construction and Catmull-Clark subdivision.
//!
//! Quadrille builds quad meshes with explicit vertex, edge and face
//! incidence and refines them one Catmull-Clark level at a time. Every level
//! produces a new mesh that satisfies the same invariants as its input, so
//! refinement composes: three levels on a cube give a 386-vertex quad sphere.
//!
//! ## Features
//!
//! - **Explicit adjacency**: vertices, edges and faces reference each other by
//!   type-safe indices
//! - **Exact vertex merging**: coincident subdivision points collapse onto one
//!   vertex
//! - **File formats**: OBJ and PLY quad meshes
//!
//! ## Quick Start
//!
//! ```
//! use quadrille::prelude::*;
//!
//! let cube = build_base_mesh(&BaseShape::Cube { half_extent: 1.0 }).unwrap();
//! assert_eq!(cube.num_vertices(), 8);
//!
//! let level1 = subdivide(&cube).unwrap();
//! assert_eq!(level1.num_vertices(), 26);
//! assert_eq!(level1.num_edges(), 48);
//! assert_eq!(level1.num_faces(), 24);
//! assert_eq!(level1.euler_characteristic(), 2);
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use quadrille::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//!     Point3::new(2.0, 1.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 4, 5], [1, 2, 3, 4]];
//!
//! let mesh = build_from_quads(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_edges(), 7);
//!
//! // The shared side knows both faces
//! let shared = mesh.face(FaceId::new(0)).edges()[1];
//! assert_eq!(mesh.edge(shared).faces().len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use quadrille::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::subdivide::{
        catmull_clark_subdivide, subdivide, BoundaryRule, SubdivideOptions,
    };
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_base_mesh, build_from_quads, cube, BaseShape, Edge, EdgeId, EdgeIdentity, Face,
        FaceId, QuadMesh, Vertex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
