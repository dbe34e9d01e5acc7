//! Edge discovery and incidence resolution.
//!
//! Given vertex positions and quad faces, this derives the edge set and the
//! face→edge, edge→face and vertex→edge references. Resolution runs in two
//! passes: every face side is first assigned an edge (creating edges as they
//! are met), then the back-references are linked once the edge table is
//! final.

use std::collections::HashMap;

use nalgebra::Point3;

use super::emitter::position_key;
use super::index::{EdgeId, FaceId, VertexId};
use super::quad::{segment_midpoint, Edge};

/// How two face sides are recognised as the same edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgeIdentity {
    /// Sides are the same edge when they join the same two vertex indices.
    #[default]
    VertexPair,
    /// Sides are the same edge when their midpoints are exactly equal.
    ///
    /// Sensitive to floating-point rounding; two vertices at the same
    /// position under different indices also merge their edges.
    Midpoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EdgeKey {
    Pair(VertexId, VertexId),
    Midpoint([u32; 3]),
}

impl EdgeKey {
    fn new(identity: EdgeIdentity, a: VertexId, b: VertexId, midpoint: &Point3<f32>) -> Self {
        match identity {
            EdgeIdentity::VertexPair => {
                if a < b {
                    EdgeKey::Pair(a, b)
                } else {
                    EdgeKey::Pair(b, a)
                }
            }
            EdgeIdentity::Midpoint => EdgeKey::Midpoint(position_key(midpoint)),
        }
    }
}

/// Edges and incidence derived from a face list.
#[derive(Debug, Clone)]
pub struct Adjacency {
    /// Discovered edges, with their incident faces linked.
    pub edges: Vec<Edge>,
    /// For each face, its four edges; `face_edges[f][i]` is the side from
    /// corner `i` to corner `(i + 1) % 4`.
    pub face_edges: Vec<[EdgeId; 4]>,
    /// For each vertex, its incident edges.
    pub vertex_edges: Vec<Vec<EdgeId>>,
}

/// Derive edges and incidence for `faces` over `positions`.
///
/// Face corner indices must already be in range. Under
/// [`EdgeIdentity::Midpoint`] a side may be matched to an edge whose
/// endpoints are other vertices at the same positions; weld coincident
/// vertices first, as [`build_from_quads_with`](super::build_from_quads_with)
/// does.
pub fn resolve_adjacency(
    positions: &[Point3<f32>],
    faces: &[[VertexId; 4]],
    identity: EdgeIdentity,
) -> Adjacency {
    let mut edges: Vec<Edge> = Vec::with_capacity(faces.len() * 2);
    let mut lookup: HashMap<EdgeKey, EdgeId> = HashMap::with_capacity(faces.len() * 2);
    let mut face_edges: Vec<[EdgeId; 4]> = Vec::with_capacity(faces.len());

    // Pass 1: assign every face side to an edge
    for face in faces {
        let mut sides = [EdgeId::new(0); 4];
        for i in 0..4 {
            let a = face[i];
            let b = face[(i + 1) % 4];
            let midpoint = segment_midpoint(&positions[a.index()], &positions[b.index()]);
            let key = EdgeKey::new(identity, a, b, &midpoint);

            sides[i] = *lookup.entry(key).or_insert_with(|| {
                let id = EdgeId::new(edges.len());
                edges.push(Edge {
                    vertices: [a, b],
                    midpoint,
                    faces: Vec::with_capacity(2),
                });
                id
            });
        }
        face_edges.push(sides);
    }

    // Pass 2: link faces and vertices back to the final edge table
    for (fi, sides) in face_edges.iter().enumerate() {
        let fid = FaceId::new(fi);
        for &e in sides {
            let faces = &mut edges[e.index()].faces;
            if !faces.contains(&fid) {
                faces.push(fid);
            }
        }
    }

    let mut vertex_edges: Vec<Vec<EdgeId>> = vec![Vec::new(); positions.len()];
    for (ei, edge) in edges.iter().enumerate() {
        for v in edge.vertices {
            vertex_edges[v.index()].push(EdgeId::new(ei));
        }
    }

    log::trace!(
        "resolved {} edges from {} faces ({:?} identity)",
        edges.len(),
        faces.len(),
        identity
    );

    Adjacency {
        edges,
        face_edges,
        vertex_edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(face: [usize; 4]) -> [VertexId; 4] {
        face.map(VertexId::new)
    }

    fn two_quads() -> (Vec<Point3<f32>>, Vec<[VertexId; 4]>) {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let faces = vec![ids([0, 1, 2, 3]), ids([1, 4, 5, 2])];
        (positions, faces)
    }

    #[test]
    fn test_shared_edge_links_both_faces() {
        let (positions, faces) = two_quads();
        let adj = resolve_adjacency(&positions, &faces, EdgeIdentity::VertexPair);

        assert_eq!(adj.edges.len(), 7);

        // Side 1 of face 0 (1 -> 2) and side 3 of face 1 (2 -> 1) are one edge
        let shared = adj.face_edges[0][1];
        assert_eq!(adj.face_edges[1][3], shared);
        assert_eq!(
            adj.edges[shared.index()].faces,
            vec![FaceId::new(0), FaceId::new(1)]
        );
        assert_eq!(
            adj.edges[shared.index()].vertices,
            [VertexId::new(1), VertexId::new(2)]
        );
    }

    #[test]
    fn test_vertex_edges() {
        let (positions, faces) = two_quads();
        let adj = resolve_adjacency(&positions, &faces, EdgeIdentity::VertexPair);

        assert_eq!(adj.vertex_edges[0].len(), 2);
        assert_eq!(adj.vertex_edges[1].len(), 3);
        assert_eq!(adj.vertex_edges[2].len(), 3);
        assert_eq!(adj.vertex_edges[4].len(), 2);
    }

    #[test]
    fn test_midpoint_identity_matches_pairs_on_distinct_positions() {
        let (positions, faces) = two_quads();
        let by_pair = resolve_adjacency(&positions, &faces, EdgeIdentity::VertexPair);
        let by_mid = resolve_adjacency(&positions, &faces, EdgeIdentity::Midpoint);

        assert_eq!(by_pair.face_edges, by_mid.face_edges);
        assert_eq!(by_pair.edges, by_mid.edges);
    }

    #[test]
    fn test_midpoint_identity_merges_coincident_vertices() {
        // Vertex 4 sits on top of vertex 1, vertex 5 on top of vertex 2
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let faces = vec![ids([0, 1, 2, 3]), ids([4, 6, 7, 5])];

        let by_pair = resolve_adjacency(&positions, &faces, EdgeIdentity::VertexPair);
        let by_mid = resolve_adjacency(&positions, &faces, EdgeIdentity::Midpoint);

        assert_eq!(by_pair.edges.len(), 8);
        assert_eq!(by_mid.edges.len(), 7);
    }
}
