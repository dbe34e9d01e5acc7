//! Mesh processing algorithms.
//!
//! - **Subdivision**: Catmull-Clark subdivision of quad meshes
//! - **Progress**: callback-based progress reporting for multi-level runs

mod progress;
pub mod subdivide;

pub use progress::Progress;
