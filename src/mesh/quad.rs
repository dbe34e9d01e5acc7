//! Quad mesh data structure.
//!
//! A [`QuadMesh`] stores vertices, edges and quad faces with explicit
//! cross-references in both directions:
//!
//! - a vertex knows its incident edges and faces
//! - an edge knows its two endpoints and its incident faces
//! - a face knows its four corners (in winding order) and its four edges
//!
//! Derived positions (edge midpoints and face centroids) are computed once at
//! construction and can only be read. A mesh is never modified after it is
//! built; refinement produces a new mesh.

use nalgebra::{Point3, Vector3};

use super::adjacency::EdgeIdentity;
use super::index::{EdgeId, FaceId, VertexId};

/// A vertex in the quad mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub(crate) position: Point3<f32>,
    pub(crate) edges: Vec<EdgeId>,
    pub(crate) faces: Vec<FaceId>,
}

impl Vertex {
    /// The 3D position of this vertex.
    #[inline]
    pub fn position(&self) -> &Point3<f32> {
        &self.position
    }

    /// Edges incident to this vertex.
    #[inline]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Faces incident to this vertex.
    #[inline]
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    /// Number of incident edges.
    #[inline]
    pub fn valence(&self) -> usize {
        self.edges.len()
    }
}

/// An edge joining two vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub(crate) vertices: [VertexId; 2],
    pub(crate) midpoint: Point3<f32>,
    pub(crate) faces: Vec<FaceId>,
}

impl Edge {
    /// The two endpoints, in the order the edge was first met while walking
    /// face windings.
    #[inline]
    pub fn vertices(&self) -> [VertexId; 2] {
        self.vertices
    }

    /// Mean of the two endpoint positions.
    #[inline]
    pub fn midpoint(&self) -> &Point3<f32> {
        &self.midpoint
    }

    /// Faces sharing this edge.
    #[inline]
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    /// Whether the edge has fewer than two incident faces.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.faces.len() < 2
    }

    /// The endpoint that is not `v`.
    #[inline]
    pub fn other(&self, v: VertexId) -> VertexId {
        if self.vertices[0] == v {
            self.vertices[1]
        } else {
            self.vertices[0]
        }
    }
}

/// A quadrilateral face.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub(crate) vertices: [VertexId; 4],
    pub(crate) edges: [EdgeId; 4],
    pub(crate) centroid: Point3<f32>,
}

impl Face {
    /// Corners in winding order.
    #[inline]
    pub fn vertices(&self) -> [VertexId; 4] {
        self.vertices
    }

    /// Edges, where `edges()[i]` joins `vertices()[i]` and `vertices()[(i + 1) % 4]`.
    #[inline]
    pub fn edges(&self) -> [EdgeId; 4] {
        self.edges
    }

    /// Mean of the four corner positions.
    #[inline]
    pub fn centroid(&self) -> &Point3<f32> {
        &self.centroid
    }
}

/// Mean of four corner positions, summed in corner order.
#[inline]
pub fn quad_centroid(corners: &[Point3<f32>; 4]) -> Point3<f32> {
    let sum = corners[0].coords + corners[1].coords + corners[2].coords + corners[3].coords;
    Point3::from(sum / 4.0)
}

/// Mean of two positions.
#[inline]
pub fn segment_midpoint(a: &Point3<f32>, b: &Point3<f32>) -> Point3<f32> {
    Point3::from((a.coords + b.coords) / 2.0)
}

/// A quad mesh with full vertex/edge/face adjacency.
#[derive(Debug, Clone)]
pub struct QuadMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) faces: Vec<Face>,
    pub(crate) edge_identity: EdgeIdentity,
}

impl QuadMesh {
    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get an edge by ID.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f32> {
        &self.vertices[v.index()].position
    }

    /// The rule used to decide when two face sides are the same edge.
    #[inline]
    pub fn edge_identity(&self) -> EdgeIdentity {
        self.edge_identity
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all edges with their IDs.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::new(i), e))
    }

    /// Iterate over all faces with their IDs.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, f)| (FaceId::new(i), f))
    }

    /// Iterate over edges with fewer than two incident faces.
    pub fn boundary_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges()
            .filter(|(_, e)| e.is_boundary())
            .map(|(id, _)| id)
    }

    // ==================== Geometry ====================

    /// Positions of the four corners of a face, in winding order.
    pub fn face_positions(&self, f: FaceId) -> [Point3<f32>; 4] {
        self.faces[f.index()].vertices.map(|v| *self.position(v))
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = self.vertices.first()?.position;
        let (min, max) = self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.inf(&v.position), max.sup(&v.position))
        });
        Some((min, max))
    }

    /// Mean of all vertex positions.
    pub fn vertex_centroid(&self) -> Option<Point3<f32>> {
        if self.vertices.is_empty() {
            return None;
        }
        let sum: Vector3<f32> = self.vertices.iter().map(|v| v.position.coords).sum();
        Some(Point3::from(sum / self.vertices.len() as f32))
    }

    // ==================== Topology ====================

    /// Valence (edge degree) of a vertex.
    #[inline]
    pub fn valence(&self, v: VertexId) -> usize {
        self.vertices[v.index()].edges.len()
    }

    /// Euler characteristic `V - E + F`.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_vertices() as i64 - self.num_edges() as i64 + self.num_faces() as i64
    }

    /// Whether every edge has exactly two incident faces.
    pub fn is_closed(&self) -> bool {
        self.edges.iter().all(|e| e.faces.len() == 2)
    }

    /// Check that all cross-references are consistent and all derived
    /// positions match their defining points.
    pub fn is_valid(&self) -> bool {
        let nv = self.vertices.len();
        let ne = self.edges.len();
        let nf = self.faces.len();

        for (fi, face) in self.faces.iter().enumerate() {
            let fid = FaceId::new(fi);
            for i in 0..4 {
                let v = face.vertices[i];
                let e = face.edges[i];
                if v.index() >= nv || e.index() >= ne {
                    return false;
                }
                let next = face.vertices[(i + 1) % 4];
                let [a, b] = self.edges[e.index()].vertices;
                if !((a == v && b == next) || (a == next && b == v)) {
                    return false;
                }
                if !self.vertices[v.index()].faces.contains(&fid) {
                    return false;
                }
                if !self.edges[e.index()].faces.contains(&fid) {
                    return false;
                }
            }
            if face.centroid != quad_centroid(&self.face_positions(fid)) {
                return false;
            }
        }

        for (ei, edge) in self.edges.iter().enumerate() {
            let eid = EdgeId::new(ei);
            let [a, b] = edge.vertices;
            if a.index() >= nv || b.index() >= nv || a == b {
                return false;
            }
            if !self.vertices[a.index()].edges.contains(&eid)
                || !self.vertices[b.index()].edges.contains(&eid)
            {
                return false;
            }
            if edge.faces.is_empty() || edge.faces.iter().any(|f| f.index() >= nf) {
                return false;
            }
            if edge.midpoint != segment_midpoint(self.position(a), self.position(b)) {
                return false;
            }
        }

        for vertex in &self.vertices {
            if vertex.faces.iter().any(|f| f.index() >= nf)
                || vertex.edges.iter().any(|e| e.index() >= ne)
            {
                return false;
            }
        }

        true
    }
}
