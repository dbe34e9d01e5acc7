//! Wavefront OBJ format support.
//!
//! Only `v` and `f` records are interpreted. Face corners may carry texture
//! and normal references (`v/vt/vn`), which are ignored. Indices are 1-based;
//! negative indices count back from the most recent vertex.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_quads, to_face_vertex, QuadMesh};

use super::to_quad;

/// Load a quad mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use quadrille::io::obj;
///
/// let mesh = obj::load("cube.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<QuadMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read(BufReader::new(file)).map_err(|e| match e {
        MeshError::LoadError { message, .. } => MeshError::load_error(path, message),
        other => other,
    })
}

/// Read a quad mesh from OBJ text.
pub fn read<R: BufRead>(reader: R) -> Result<QuadMesh> {
    let source = Path::new("<reader>");
    let mut vertices: Vec<Point3<f32>> = Vec::new();
    let mut faces: Vec<[usize; 4]> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let coords: Vec<f32> = tokens
                    .take(3)
                    .map(|t| t.parse::<f32>())
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| {
                        MeshError::load_error(source, format!("line {}: {}", line_no + 1, e))
                    })?;
                if coords.len() != 3 {
                    return Err(MeshError::load_error(
                        source,
                        format!("line {}: vertex needs 3 coordinates", line_no + 1),
                    ));
                }
                if !coords.iter().all(|c| c.is_finite()) {
                    return Err(MeshError::load_error(
                        source,
                        format!("line {}: non-finite vertex coordinate", line_no + 1),
                    ));
                }
                vertices.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            Some("f") => {
                let indices = tokens
                    .map(|t| resolve_index(t, vertices.len()))
                    .collect::<Option<Vec<usize>>>()
                    .ok_or_else(|| {
                        MeshError::load_error(
                            source,
                            format!("line {}: malformed face index", line_no + 1),
                        )
                    })?;
                faces.push(to_quad(faces.len(), &indices)?);
            }
            _ => {}
        }
    }

    build_from_quads(&vertices, &faces)
}

/// Convert one `f` token to a 0-based vertex index.
fn resolve_index(token: &str, num_vertices: usize) -> Option<usize> {
    let raw: i64 = token.split('/').next()?.parse().ok()?;
    match raw {
        0 => None,
        r if r > 0 => Some(r as usize - 1),
        r => num_vertices.checked_sub(r.unsigned_abs() as usize),
    }
}

/// Save a quad mesh to an OBJ file.
pub fn save<P: AsRef<Path>>(mesh: &QuadMesh, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a quad mesh as OBJ text.
pub fn write<W: Write>(mesh: &QuadMesh, writer: &mut W) -> Result<()> {
    let (vertices, faces) = to_face_vertex(mesh);

    writeln!(writer, "# Generated by quadrille")?;
    writeln!(writer, "# {} vertices, {} faces", vertices.len(), faces.len())?;
    for v in &vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for f in &faces {
        writeln!(writer, "f {} {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1, f[3] + 1)?;
    }
    Ok(())
}
