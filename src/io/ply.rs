//! PLY (Stanford polygon) format support.
//!
//! Loading accepts ASCII and binary files through `ply-rs`; saving writes
//! ASCII with one four-entry `vertex_indices` list per face.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_quads, to_face_vertex, QuadMesh};

use super::to_quad;

/// Load a quad mesh from a PLY file.
///
/// # Example
///
/// ```no_run
/// use quadrille::io::ply;
///
/// let mesh = ply::load("sphere.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<QuadMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read_from(&mut BufReader::new(file), path)
}

/// Read a quad mesh from PLY data.
pub fn read<R: BufRead>(reader: &mut R) -> Result<QuadMesh> {
    read_from(reader, Path::new("<reader>"))
}

fn read_from<R: BufRead>(reader: &mut R, path: &Path) -> Result<QuadMesh> {
    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(reader)
        .map_err(|e| MeshError::load_error(path, e.to_string()))?;

    // Extract vertices
    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| MeshError::load_error(path, "PLY file has no vertex element"))?;

    let mut vertices: Vec<Point3<f32>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let coord = |name: &str| {
            get_float_property(vertex, name).ok_or_else(|| {
                MeshError::load_error(path, format!("vertex missing {} coordinate", name))
            })
        };
        let point = Point3::new(coord("x")?, coord("y")?, coord("z")?);
        if !point.iter().all(|c| c.is_finite()) {
            return Err(MeshError::load_error(
                path,
                format!("vertex {} has a non-finite coordinate", vertices.len()),
            ));
        }
        vertices.push(point);
    }

    // Extract faces
    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| MeshError::load_error(path, "PLY file has no face element"))?;

    let mut faces: Vec<[usize; 4]> = Vec::with_capacity(face_element.len());
    for (fi, face) in face_element.iter().enumerate() {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| MeshError::load_error(path, "face missing vertex_indices property"))?;
        faces.push(to_quad(fi, &indices)?);
    }

    build_from_quads(&vertices, &faces)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f32> {
    match element.get(name)? {
        Property::Float(v) => Some(*v),
        Property::Double(v) => Some(*v as f32),
        Property::Int(v) => Some(*v as f32),
        Property::UInt(v) => Some(*v as f32),
        Property::Short(v) => Some(*v as f32),
        Property::UShort(v) => Some(*v as f32),
        Property::Char(v) => Some(*v as f32),
        Property::UChar(v) => Some(*v as f32),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Save a quad mesh to a PLY file (ASCII format).
pub fn save<P: AsRef<Path>>(mesh: &QuadMesh, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a quad mesh as ASCII PLY.
pub fn write<W: Write>(mesh: &QuadMesh, writer: &mut W) -> Result<()> {
    let (vertices, faces) = to_face_vertex(mesh);

    // Write header
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by quadrille")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "element face {}", faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for v in &vertices {
        writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
    }
    for f in &faces {
        writeln!(writer, "4 {} {} {} {}", f[0], f[1], f[2], f[3])?;
    }
    Ok(())
}
