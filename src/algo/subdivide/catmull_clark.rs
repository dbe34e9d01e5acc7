//! Catmull-Clark subdivision for quad meshes.

use nalgebra::{Point3, Vector3};

use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{build_from_quads_with, QuadMesh, VertexEmitter};

use super::{BoundaryRule, SubdivideOptions};

/// Performs one level of Catmull-Clark subdivision with default options.
///
/// The input is left untouched; the refined mesh is returned as a new value
/// with four times as many faces.
pub fn subdivide(mesh: &QuadMesh) -> Result<QuadMesh> {
    catmull_clark_subdivide_once(mesh, &SubdivideOptions::default())
}

/// Performs Catmull-Clark subdivision on a quad mesh.
///
/// # Arguments
///
/// * `mesh` - The quad mesh to subdivide
/// * `options` - Subdivision parameters
///
/// # Vertex Rules
///
/// - **Face point**: centroid of the face's four corners
/// - **Edge point**: (sum of adjacent face points + both endpoints) / (faces + 2)
/// - **Vertex point**: (F + 2E + (n-3)P) / n where:
///   - F = average of adjacent face points
///   - E = average of adjacent edge points
///   - P = original position
///   - n = valence
///
/// With [`SubdivideOptions::with_sphere_projection`], each new point is then
/// rescaled about the origin to the mean distance of the points it was built
/// from.
///
/// # Errors
///
/// Returns [`MeshError::NonManifoldEdge`] if an edge is shared by more than
/// two faces, and [`MeshError::OpenBoundary`] for boundary edges under
/// [`BoundaryRule::Closed`].
pub fn catmull_clark_subdivide(mesh: &QuadMesh, options: &SubdivideOptions) -> Result<QuadMesh> {
    catmull_clark_subdivide_with_progress(mesh, options, &Progress::none())
}

/// Catmull-Clark subdivision with progress reporting.
pub fn catmull_clark_subdivide_with_progress(
    mesh: &QuadMesh,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<QuadMesh> {
    let mut current = mesh.clone();

    for iter in 0..options.iterations {
        progress.report(iter, options.iterations, "Catmull-Clark subdivision");
        current = catmull_clark_subdivide_once(&current, options)?;
        log::debug!(
            "level {}: {} vertices, {} edges, {} faces",
            iter + 1,
            current.num_vertices(),
            current.num_edges(),
            current.num_faces()
        );
    }

    if options.iterations > 0 {
        progress.report(options.iterations, options.iterations, "Catmull-Clark subdivision");
    }
    Ok(current)
}

/// Perform one level of Catmull-Clark subdivision.
fn catmull_clark_subdivide_once(mesh: &QuadMesh, options: &SubdivideOptions) -> Result<QuadMesh> {
    check_edges(mesh, options.boundary)?;

    // Step 1: Edge points
    let mut edge_points = compute_edge_points(mesh);

    // Step 2: Vertex points
    let mut vertex_points = compute_vertex_points(mesh, &edge_points);

    let mut face_points: Vec<Point3<f32>> = mesh.faces().map(|(_, f)| *f.centroid()).collect();
    if options.sphere_projection {
        project_to_parent_radii(mesh, &mut edge_points, &mut vertex_points, &mut face_points);
    }

    // Step 3-4: Split faces, merging shared corners
    let capacity = mesh.num_vertices() + mesh.num_edges() + mesh.num_faces();
    let mut emitter = VertexEmitter::with_capacity(capacity);
    let mut new_faces: Vec<[usize; 4]> = Vec::with_capacity(mesh.num_faces() * 4);

    for (fid, face) in mesh.faces() {
        let vertices = face.vertices();
        let edges = face.edges();
        for i in 0..4 {
            // Corner i sits between the edge leaving it and the edge entering it
            let leaving = edges[i];
            let entering = edges[(i + 3) % 4];
            let corners = [
                vertex_points[vertices[i].index()],
                edge_points[leaving.index()],
                face_points[fid.index()],
                edge_points[entering.index()],
            ];
            new_faces.push(corners.map(|p| emitter.emit(p).index()));
        }
    }

    // Step 5: Rebuild adjacency
    build_from_quads_with(&emitter.into_positions(), &new_faces, mesh.edge_identity())
}

/// Reject edges the subdivision rules cannot handle.
fn check_edges(mesh: &QuadMesh, boundary: BoundaryRule) -> Result<()> {
    let mut boundary_edges = 0;

    for (id, edge) in mesh.edges() {
        let [v0, v1] = edge.vertices();
        match edge.faces().len() {
            2 => {}
            n if n > 2 => {
                return Err(MeshError::NonManifoldEdge {
                    edge: id.index(),
                    v0: v0.index(),
                    v1: v1.index(),
                    faces: n,
                });
            }
            _ if boundary == BoundaryRule::Closed => {
                return Err(MeshError::OpenBoundary {
                    edge: id.index(),
                    v0: v0.index(),
                    v1: v1.index(),
                });
            }
            _ => boundary_edges += 1,
        }
    }

    if boundary_edges > 0 {
        log::warn!(
            "subdividing {} boundary edges with generic weights",
            boundary_edges
        );
    }
    Ok(())
}

/// Compute one edge point per edge, indexed by edge ID.
fn compute_edge_points(mesh: &QuadMesh) -> Vec<Point3<f32>> {
    mesh.edges()
        .map(|(_, edge)| {
            let [v0, v1] = edge.vertices();
            let face_sum: Vector3<f32> = edge
                .faces()
                .iter()
                .map(|&f| mesh.face(f).centroid().coords)
                .sum();
            let sum = face_sum + mesh.position(v0).coords + mesh.position(v1).coords;
            Point3::from(sum / (edge.faces().len() + 2) as f32)
        })
        .collect()
}

/// Compute the moved position of every original vertex, indexed by vertex ID.
fn compute_vertex_points(mesh: &QuadMesh, edge_points: &[Point3<f32>]) -> Vec<Point3<f32>> {
    mesh.vertices()
        .map(|(_, vertex)| {
            let valence = vertex.valence();
            // Isolated vertex, never emitted
            if valence == 0 || vertex.faces().is_empty() {
                return *vertex.position();
            }

            // F = average of adjacent face points
            let f: Vector3<f32> = vertex
                .faces()
                .iter()
                .map(|&fi| mesh.face(fi).centroid().coords)
                .sum::<Vector3<f32>>()
                / vertex.faces().len() as f32;

            // E = average of adjacent edge points
            let e: Vector3<f32> = vertex
                .edges()
                .iter()
                .map(|&ei| edge_points[ei.index()].coords)
                .sum::<Vector3<f32>>()
                / valence as f32;

            let p = vertex.position().coords;
            let n = valence as f32;
            Point3::from((f + e * 2.0 + p * (n - 3.0)) / n)
        })
        .collect()
}

/// Rescale every new point to the mean distance from the origin of the
/// points it was derived from.
fn project_to_parent_radii(
    mesh: &QuadMesh,
    edge_points: &mut [Point3<f32>],
    vertex_points: &mut [Point3<f32>],
    face_points: &mut [Point3<f32>],
) {
    let radius = |v| mesh.position(v).coords.norm();

    for ((_, edge), point) in mesh.edges().zip(edge_points.iter_mut()) {
        let [v0, v1] = edge.vertices();
        *point = project_to_radius(*point, (radius(v0) + radius(v1)) * 0.5);
    }
    for (v, point) in mesh.vertex_ids().zip(vertex_points.iter_mut()) {
        *point = project_to_radius(*point, radius(v));
    }
    for ((_, face), point) in mesh.faces().zip(face_points.iter_mut()) {
        let sum: f32 = face.vertices().iter().map(|&v| radius(v)).sum();
        *point = project_to_radius(*point, sum / 4.0);
    }
}

/// Move `point` along its direction from the origin to distance `radius`.
/// The origin itself has no direction and is returned unchanged.
fn project_to_radius(point: Point3<f32>, radius: f32) -> Point3<f32> {
    let norm = point.coords.norm();
    if norm > 0.0 {
        Point3::from(point.coords * (radius / norm))
    } else {
        point
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::mesh::{build_from_quads, build_from_quads_with, cube, quad_centroid, EdgeIdentity};

    fn create_single_quad() -> QuadMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap()
    }

    fn create_two_quads() -> QuadMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        build_from_quads(&vertices, &[[0, 1, 2, 3], [1, 4, 5, 2]]).unwrap()
    }

    fn nearest(mesh: &QuadMesh, target: Point3<f32>) -> Point3<f32> {
        mesh.vertex_ids()
            .map(|v| *mesh.position(v))
            .min_by(|a, b| {
                (a - target)
                    .norm()
                    .partial_cmp(&(b - target).norm())
                    .unwrap()
            })
            .unwrap()
    }

    #[test]
    fn test_catmull_clark_cube_counts() {
        let mesh = cube(1.0).unwrap();
        let refined = subdivide(&mesh).unwrap();

        // 8 moved corners + 12 edge points + 6 face points
        assert_eq!(refined.num_vertices(), 26);
        assert_eq!(refined.num_edges(), 48);
        assert_eq!(refined.num_faces(), 24);
        assert!(refined.is_valid());
    }

    #[test]
    fn test_catmull_clark_quadruples_faces() {
        let mesh = create_two_quads();
        let refined = subdivide(&mesh).unwrap();
        assert_eq!(refined.num_faces(), mesh.num_faces() * 4);
    }

    #[test]
    fn test_every_face_is_a_quad_with_four_edges() {
        let refined = subdivide(&cube(1.0).unwrap()).unwrap();
        for (_, face) in refined.faces() {
            let v = face.vertices();
            for i in 0..4 {
                let [a, b] = refined.edge(face.edges()[i]).vertices();
                let next = v[(i + 1) % 4];
                assert!((a == v[i] && b == next) || (a == next && b == v[i]));
            }
        }
    }

    #[test]
    fn test_three_levels_on_cube() {
        let expected = [(26, 48, 24), (98, 192, 96), (386, 768, 384)];
        let mut mesh = cube(1.0).unwrap();
        assert_eq!(mesh.euler_characteristic(), 2);

        for &(v, e, f) in &expected {
            let previous_faces = mesh.num_faces();
            mesh = subdivide(&mesh).unwrap();
            assert_eq!(mesh.num_vertices(), v);
            assert_eq!(mesh.num_edges(), e);
            assert_eq!(mesh.num_faces(), f);
            assert_eq!(mesh.num_faces(), previous_faces * 4);
            assert_eq!(mesh.euler_characteristic(), 2);
            assert!(mesh.is_closed());
        }
    }

    #[test]
    fn test_options_iterations_match_repeated_calls() {
        let mesh = cube(1.0).unwrap();
        let once_twice = subdivide(&subdivide(&mesh).unwrap()).unwrap();
        let options = catmull_clark_subdivide(&mesh, &SubdivideOptions::new(2)).unwrap();

        assert_eq!(once_twice.num_vertices(), options.num_vertices());
        for v in once_twice.vertex_ids() {
            assert_eq!(once_twice.position(v), options.position(v));
        }
    }

    #[test]
    fn test_zero_iterations_returns_copy() {
        let mesh = cube(1.0).unwrap();
        let result = catmull_clark_subdivide(&mesh, &SubdivideOptions::new(0)).unwrap();
        assert_eq!(result.num_faces(), 6);
        assert_eq!(result.num_vertices(), 8);
    }

    #[test]
    fn test_centroids_are_corner_means() {
        let mesh = cube(1.0).unwrap();
        let refined = subdivide(&mesh).unwrap();
        for m in [&mesh, &refined] {
            for fid in m.face_ids() {
                assert_eq!(*m.face(fid).centroid(), quad_centroid(&m.face_positions(fid)));
            }
        }
    }

    #[test]
    fn test_edge_point_on_cube() {
        let mesh = cube(1.0).unwrap();
        let edge_points = compute_edge_points(&mesh);

        // Edge from (-1,-1,1) to (1,-1,1) between the -y and +z faces
        let (id, _) = mesh
            .edges()
            .find(|(_, e)| {
                let [a, b] = e.vertices();
                let mid = (mesh.position(a).coords + mesh.position(b).coords) / 2.0;
                mid == Vector3::new(0.0, -1.0, 1.0)
            })
            .unwrap();
        assert_eq!(edge_points[id.index()], Point3::new(0.0, -0.75, 0.75));
    }

    #[test]
    fn test_valence_three_vertex_rule() {
        let mesh = cube(1.0).unwrap();
        let corner = mesh
            .vertex_ids()
            .find(|&v| *mesh.position(v) == Point3::new(-1.0, -1.0, 1.0))
            .unwrap();
        assert_eq!(mesh.valence(corner), 3);

        let edge_points = compute_edge_points(&mesh);
        let vertex_points = compute_vertex_points(&mesh, &edge_points);
        let moved = vertex_points[corner.index()];

        // F = (-1/3, -1/3, 1/3), E = (-1/2, -1/2, 1/2), (F + 2E) / 3
        let expected = Point3::new(-4.0 / 9.0, -4.0 / 9.0, 4.0 / 9.0);
        assert!((moved - expected).norm() < 1e-6);

        let f: Vector3<f32> = mesh
            .vertex(corner)
            .faces()
            .iter()
            .map(|&fi| mesh.face(fi).centroid().coords)
            .sum::<Vector3<f32>>()
            / 3.0;
        let e: Vector3<f32> = mesh
            .vertex(corner)
            .edges()
            .iter()
            .map(|&ei| edge_points[ei.index()].coords)
            .sum::<Vector3<f32>>()
            / 3.0;
        assert_eq!(moved.coords, (f + e * 2.0) / 3.0);

        // The moved corner is one of the refined mesh's vertices
        let refined = subdivide(&mesh).unwrap();
        assert!((nearest(&refined, expected) - expected).norm() < 1e-6);
    }

    #[test]
    fn test_cube_rounds_toward_sphere() {
        let spread = |mesh: &QuadMesh| {
            let radii: Vec<f32> = mesh
                .vertex_ids()
                .map(|v| mesh.position(v).coords.norm())
                .collect();
            let max = radii.iter().cloned().fold(f32::MIN, f32::max);
            let min = radii.iter().cloned().fold(f32::MAX, f32::min);
            max / min
        };

        // Cube corners are equidistant from the centre; the first level is not
        let first = subdivide(&cube(1.0).unwrap()).unwrap();
        let refined = catmull_clark_subdivide(&first, &SubdivideOptions::new(2)).unwrap();

        assert!(spread(&refined) < spread(&first));
        assert!(refined.vertex_centroid().unwrap().coords.norm() < 1e-4);
    }

    #[test]
    fn test_single_quad_generic_boundary() {
        let mesh = create_single_quad();
        let refined = subdivide(&mesh).unwrap();

        // 4 corners + 4 edge points + 1 face point
        assert_eq!(refined.num_vertices(), 9);
        assert_eq!(refined.num_faces(), 4);
        assert_eq!(refined.num_edges(), 12);
        assert!(refined.is_valid());
    }

    #[test]
    fn test_two_quads_generic_boundary() {
        let refined = subdivide(&create_two_quads()).unwrap();
        // 6 corners + 7 edge points + 2 face points
        assert_eq!(refined.num_vertices(), 15);
        assert_eq!(refined.num_faces(), 8);
    }

    #[test]
    fn test_closed_rule_rejects_boundary() {
        let options = SubdivideOptions::new(1).closed();
        let result = catmull_clark_subdivide(&create_single_quad(), &options);
        assert!(matches!(result, Err(MeshError::OpenBoundary { .. })));

        let closed = catmull_clark_subdivide(&cube(1.0).unwrap(), &options);
        assert!(closed.is_ok());
    }

    #[test]
    fn test_non_manifold_edge_rejected() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let faces = [[0, 1, 2, 3], [1, 0, 4, 5], [0, 1, 6, 7]];
        let mesh = build_from_quads(&vertices, &faces).unwrap();

        let result = subdivide(&mesh);
        assert!(matches!(
            result,
            Err(MeshError::NonManifoldEdge { edge: 0, faces: 3, .. })
        ));
    }

    #[test]
    fn test_midpoint_identity_carries_through_levels() {
        let base = cube(1.0).unwrap();
        let (vertices, faces) = crate::mesh::to_face_vertex(&base);
        let mesh = build_from_quads_with(&vertices, &faces, EdgeIdentity::Midpoint).unwrap();

        let by_mid = catmull_clark_subdivide(&mesh, &SubdivideOptions::new(3)).unwrap();
        let by_pair = catmull_clark_subdivide(&base, &SubdivideOptions::new(3)).unwrap();

        assert_eq!(by_mid.edge_identity(), EdgeIdentity::Midpoint);
        assert_eq!(by_mid.num_vertices(), by_pair.num_vertices());
        assert_eq!(by_mid.num_edges(), by_pair.num_edges());
        assert_eq!(by_mid.num_faces(), by_pair.num_faces());
    }

    #[test]
    fn test_sphere_projection_keeps_cube_radius() {
        let radii = |mesh: &QuadMesh| -> Vec<f32> {
            mesh.vertex_ids()
                .map(|v| mesh.position(v).coords.norm())
                .collect()
        };
        let options = SubdivideOptions::new(3).with_sphere_projection(true);
        let sphere = catmull_clark_subdivide(&cube(1.0).unwrap(), &options).unwrap();

        assert_eq!(sphere.num_faces(), 384);
        assert!(sphere.is_closed());
        assert!(sphere.is_valid());

        let r = radii(&sphere);
        let max = r.iter().cloned().fold(f32::MIN, f32::max);
        let min = r.iter().cloned().fold(f32::MAX, f32::min);
        assert!(max - min < 1e-5, "radius spread {}", max - min);
        assert!((max - 3.0f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_projection_off_by_default() {
        let mesh = cube(1.0).unwrap();
        let plain = subdivide(&mesh).unwrap();
        let options = SubdivideOptions::default();
        assert!(!options.sphere_projection);

        // The -y/+z edge point sits inside the circumscribed sphere
        let edge_point = Point3::new(0.0, -0.75, 0.75);
        assert_eq!(nearest(&plain, edge_point), edge_point);

        let projected =
            catmull_clark_subdivide(&mesh, &options.with_sphere_projection(true)).unwrap();
        let moved = nearest(&projected, Point3::new(0.0, -1.2247, 1.2247));
        assert!((moved.coords.norm() - 3.0f32.sqrt()).abs() < 1e-5);
        assert_eq!(moved.x, 0.0);
    }

    #[test]
    fn test_midpoint_identity_unwelded_input_stays_closed() {
        // Each face owns its corners; the copies coincide exactly
        let base = cube(1.0).unwrap();
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for fid in base.face_ids() {
            let first = vertices.len();
            vertices.extend(base.face_positions(fid));
            faces.push([first, first + 1, first + 2, first + 3]);
        }

        let mesh = build_from_quads_with(&vertices, &faces, EdgeIdentity::Midpoint).unwrap();
        assert!(mesh.is_closed());
        for v in mesh.vertex_ids() {
            assert!(mesh.valence(v) > 0);
        }

        let refined = subdivide(&mesh).unwrap();
        assert_eq!(refined.num_vertices(), 26);
        assert_eq!(refined.num_edges(), 48);
        assert_eq!(refined.num_faces(), 24);
        assert!(refined.is_closed());
        assert!(refined.is_valid());

        // Original corners are all moved inward
        for v in refined.vertex_ids() {
            assert!(refined.position(v).coords.norm() < 3.0f32.sqrt());
        }
    }

    #[test]
    fn test_input_is_not_modified() {
        let mesh = cube(1.0).unwrap();
        let before: Vec<Point3<f32>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();
        let _ = subdivide(&mesh).unwrap();
        let after: Vec<Point3<f32>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_progress_reports_each_level() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |current, total, _| {
            sink.lock().unwrap().push((current, total));
        });

        let mesh = cube(1.0).unwrap();
        catmull_clark_subdivide_with_progress(&mesh, &SubdivideOptions::new(2), &progress)
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![(0, 2), (1, 2), (2, 2)]);
    }
}
