//! Deduplicating vertex emission.
//!
//! Points computed independently for neighbouring faces (a shared edge point,
//! a shared vertex point) must land on a single output vertex. The emitter
//! hands out one [`VertexId`] per distinct position, where "distinct" means
//! not exactly equal under IEEE `==`. No tolerance is applied.

use std::collections::HashMap;

use nalgebra::Point3;

use super::index::VertexId;

/// Hash key equivalent to exact `==` on the three coordinates.
///
/// `-0.0` is folded onto `0.0` so that the two zeros, which compare equal,
/// share a key. NaN never compares equal and is never looked up.
pub(crate) fn position_key(p: &Point3<f32>) -> [u32; 3] {
    let bits = |c: f32| if c == 0.0 { 0.0f32.to_bits() } else { c.to_bits() };
    [bits(p.x), bits(p.y), bits(p.z)]
}

/// Collects output positions, collapsing exact duplicates.
#[derive(Debug, Default)]
pub struct VertexEmitter {
    positions: Vec<Point3<f32>>,
    lookup: HashMap<[u32; 3], VertexId>,
}

impl VertexEmitter {
    /// Create an empty emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an emitter with room for `capacity` distinct vertices.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            lookup: HashMap::with_capacity(capacity),
        }
    }

    /// Return the id of a previously emitted point equal to `point`, or
    /// append `point` and return its new id.
    pub fn emit(&mut self, point: Point3<f32>) -> VertexId {
        let is_nan = point.iter().any(|c| c.is_nan());
        if !is_nan {
            if let Some(&id) = self.lookup.get(&position_key(&point)) {
                return id;
            }
        }

        let id = VertexId::new(self.positions.len());
        self.positions.push(point);
        if !is_nan {
            self.lookup.insert(position_key(&point), id);
        }
        id
    }

    /// Number of distinct vertices emitted so far.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether nothing has been emitted yet.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Emitted positions, indexed by the ids returned from [`emit`](Self::emit).
    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    /// Consume the emitter and return the emitted positions.
    pub fn into_positions(self) -> Vec<Point3<f32>> {
        self.positions
    }
}
