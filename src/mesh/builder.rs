//! Mesh construction utilities.
//!
//! This module builds [`QuadMesh`] values from face-vertex lists, as found in
//! mesh files, and from fixed base shapes.

use std::borrow::Cow;

use nalgebra::Point3;

use super::adjacency::{resolve_adjacency, EdgeIdentity};
use super::emitter::VertexEmitter;
use super::index::{FaceId, VertexId};
use super::quad::{quad_centroid, Face, QuadMesh, Vertex};
use crate::error::{MeshError, Result};

/// Base shapes that can seed a subdivision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaseShape {
    /// Axis-aligned cube centred at the origin.
    Cube {
        /// Half the edge length.
        half_extent: f32,
    },
}

impl Default for BaseShape {
    fn default() -> Self {
        BaseShape::Cube { half_extent: 1.0 }
    }
}

/// Corners of the unit cube, scaled by the half-extent.
const CUBE_CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Cube faces, counter-clockwise seen from outside.
const CUBE_FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1], // -z
    [4, 5, 6, 7], // +z
    [0, 1, 5, 4], // -y
    [2, 3, 7, 6], // +y
    [0, 4, 7, 3], // -x
    [1, 2, 6, 5], // +x
];

/// Build the mesh for a base shape.
///
/// # Example
/// ```
/// use quadrille::mesh::{build_base_mesh, BaseShape};
///
/// let mesh = build_base_mesh(&BaseShape::Cube { half_extent: 1.0 }).unwrap();
/// assert_eq!(mesh.num_vertices(), 8);
/// assert_eq!(mesh.num_edges(), 12);
/// assert_eq!(mesh.num_faces(), 6);
/// ```
pub fn build_base_mesh(shape: &BaseShape) -> Result<QuadMesh> {
    match *shape {
        BaseShape::Cube { half_extent } => cube(half_extent),
    }
}

/// Build an axis-aligned cube centred at the origin.
pub fn cube(half_extent: f32) -> Result<QuadMesh> {
    if !half_extent.is_finite() || half_extent <= 0.0 {
        return Err(MeshError::invalid_param(
            "half_extent",
            half_extent,
            "must be finite and positive",
        ));
    }

    let vertices: Vec<Point3<f32>> = CUBE_CORNERS
        .iter()
        .map(|&[x, y, z]| Point3::new(x, y, z) * half_extent)
        .collect();

    build_from_quads(&vertices, &CUBE_FACES)
}

/// Build a quad mesh from vertices and quad faces, identifying edges by
/// vertex index pairs.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of quad faces, each as [v0, v1, v2, v3] indices in winding order
///
/// # Example
/// ```
/// use quadrille::mesh::build_from_quads;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
/// assert_eq!(mesh.num_edges(), 4);
/// ```
pub fn build_from_quads(vertices: &[Point3<f32>], faces: &[[usize; 4]]) -> Result<QuadMesh> {
    build_from_quads_with(vertices, faces, EdgeIdentity::VertexPair)
}

/// Build a quad mesh from vertices and quad faces with an explicit edge
/// identity rule.
///
/// Under [`EdgeIdentity::Midpoint`] vertices at exactly equal positions are
/// welded onto the first of them before edges are resolved, so the result
/// may have fewer vertices than `vertices`.
///
/// # Errors
///
/// Returns [`MeshError::MismatchedEdge`] if a face side is matched by
/// midpoint to an edge with different endpoints.
pub fn build_from_quads_with(
    vertices: &[Point3<f32>],
    faces: &[[usize; 4]],
    identity: EdgeIdentity,
) -> Result<QuadMesh> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
    }

    let (vertices, faces): (Cow<[Point3<f32>]>, Cow<[[usize; 4]]>) = match identity {
        EdgeIdentity::VertexPair => (Cow::Borrowed(vertices), Cow::Borrowed(faces)),
        EdgeIdentity::Midpoint => {
            let (welded, remapped) = weld(vertices, faces);
            (Cow::Owned(welded), Cow::Owned(remapped))
        }
    };

    for (fi, face) in faces.iter().enumerate() {
        for i in 0..4 {
            if face[i + 1..].contains(&face[i]) {
                return Err(MeshError::DegenerateFace { face: fi });
            }
        }
    }

    let corners: Vec<[VertexId; 4]> = faces.iter().map(|f| f.map(VertexId::new)).collect();
    let adjacency = resolve_adjacency(&vertices, &corners, identity);

    for (fi, (face, sides)) in corners.iter().zip(&adjacency.face_edges).enumerate() {
        for (i, &e) in sides.iter().enumerate() {
            let [a, b] = adjacency.edges[e.index()].vertices;
            let (v, next) = (face[i], face[(i + 1) % 4]);
            if !((a == v && b == next) || (a == next && b == v)) {
                return Err(MeshError::MismatchedEdge {
                    face: fi,
                    side: i,
                    edge: e.index(),
                });
            }
        }
    }

    let mut mesh_vertices: Vec<Vertex> = vertices
        .iter()
        .zip(adjacency.vertex_edges)
        .map(|(&position, edges)| Vertex {
            position,
            edges,
            faces: Vec::new(),
        })
        .collect();

    let mut mesh_faces: Vec<Face> = Vec::with_capacity(faces.len());
    for (fi, (face, edges)) in corners.iter().zip(adjacency.face_edges).enumerate() {
        for v in face {
            mesh_vertices[v.index()].faces.push(FaceId::new(fi));
        }
        mesh_faces.push(Face {
            vertices: *face,
            edges,
            centroid: quad_centroid(&face.map(|v| vertices[v.index()])),
        });
    }

    Ok(QuadMesh {
        vertices: mesh_vertices,
        edges: adjacency.edges,
        faces: mesh_faces,
        edge_identity: identity,
    })
}

/// Collapse vertices at exactly equal positions onto the first one seen.
fn weld(vertices: &[Point3<f32>], faces: &[[usize; 4]]) -> (Vec<Point3<f32>>, Vec<[usize; 4]>) {
    let mut emitter = VertexEmitter::with_capacity(vertices.len());
    let remap: Vec<usize> = vertices.iter().map(|&p| emitter.emit(p).index()).collect();
    let faces = faces.iter().map(|f| f.map(|v| remap[v])).collect();

    let welded = emitter.into_positions();
    if welded.len() < vertices.len() {
        log::debug!("welded {} coincident vertices", vertices.len() - welded.len());
    }
    (welded, faces)
}

/// Convert a quad mesh back to vertex positions and face index lists.
pub fn to_face_vertex(mesh: &QuadMesh) -> (Vec<Point3<f32>>, Vec<[usize; 4]>) {
    let vertices = mesh.vertices.iter().map(|v| v.position).collect();
    let faces = mesh
        .faces
        .iter()
        .map(|f| f.vertices.map(|v| v.index()))
        .collect();
    (vertices, faces)
}
