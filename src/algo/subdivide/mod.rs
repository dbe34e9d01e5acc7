//! Quad mesh subdivision.
//!
//! # Catmull-Clark Subdivision
//!
//! Catmull-Clark subdivision (Catmull & Clark, 1978) is an approximating
//! subdivision scheme for quad meshes. Each level:
//!
//! 1. Creates an edge point from the edge's endpoints and adjacent face centroids
//! 2. Moves each original vertex by a valence-weighted average of its
//!    neighbouring face centroids and edge points
//! 3. Splits every quad into four, one per corner
//! 4. Merges coincident corners and rebuilds adjacency
//!
//! Applied repeatedly to a cube, the result converges toward a rounded,
//! sphere-like surface. With sphere projection enabled every level lies on
//! the cube's circumscribed sphere.
//!
//! # Example
//!
//! ```
//! use quadrille::mesh::cube;
//! use quadrille::algo::subdivide::{catmull_clark_subdivide, SubdivideOptions};
//!
//! let mesh = cube(1.0).unwrap();
//! let sphere = catmull_clark_subdivide(&mesh, &SubdivideOptions::new(3)).unwrap();
//! assert_eq!(sphere.num_faces(), 6 * 64);
//! ```
//!
//! # References
//!
//! - Catmull, E. & Clark, J. (1978). "Recursively generated B-spline surfaces
//!   on arbitrary topological meshes." Computer-Aided Design, 10(6), 350-355.

mod catmull_clark;

pub use catmull_clark::{
    catmull_clark_subdivide, catmull_clark_subdivide_with_progress, subdivide,
};

/// How edges with a single incident face are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryRule {
    /// Apply the interior formulas with the actual incident-face count as
    /// the divisor.
    #[default]
    Generic,
    /// Require a closed surface; any boundary edge is an error.
    Closed,
}

/// Options for subdivision algorithms.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of subdivision levels.
    pub iterations: usize,

    /// Treatment of boundary edges.
    pub boundary: BoundaryRule,

    /// Rescale each new point to the mean distance from the origin of the
    /// points it was built from. A cube then refines onto its circumscribed
    /// sphere instead of shrinking inside it.
    pub sphere_projection: bool,
}

impl SubdivideOptions {
    /// Create options with the specified number of levels.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            boundary: BoundaryRule::default(),
            sphere_projection: false,
        }
    }

    /// Set the boundary rule.
    pub fn with_boundary_rule(mut self, boundary: BoundaryRule) -> Self {
        self.boundary = boundary;
        self
    }

    /// Enable or disable projection onto the parents' mean radius.
    pub fn with_sphere_projection(mut self, enabled: bool) -> Self {
        self.sphere_projection = enabled;
        self
    }

    /// Require closed input.
    pub fn closed(self) -> Self {
        self.with_boundary_rule(BoundaryRule::Closed)
    }
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}
