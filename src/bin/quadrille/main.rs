//! Quadrille CLI - build and refine quad meshes from the command line.
//!
//! Usage: quadrille <COMMAND> [OPTIONS]
//!
//! Run `quadrille --help` for available commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use quadrille::algo::subdivide::{self, BoundaryRule, SubdivideOptions};
use quadrille::algo::Progress;
use quadrille::io;
use quadrille::mesh::{
    build_base_mesh, build_from_quads_with, to_face_vertex, BaseShape, EdgeIdentity, QuadMesh,
};

#[derive(Parser)]
#[command(name = "quadrille")]
#[command(author, version, about = "Quad mesh subdivision CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a cube and subdivide it
    Cube {
        /// Output mesh file (.obj or .ply)
        output: PathBuf,

        /// Half the cube's edge length
        #[arg(long, default_value = "1.0")]
        half_extent: f32,

        /// Number of subdivision levels
        #[arg(short, long, default_value = "3")]
        levels: usize,

        /// Treatment of open boundary edges
        #[arg(short, long, value_enum, default_value = "generic")]
        boundary: Boundary,

        /// Identify edges by exact midpoint instead of vertex pair
        #[arg(long)]
        midpoint_edges: bool,

        /// Project new points onto the sphere through the cube's corners
        #[arg(long)]
        sphere: bool,
    },

    /// Subdivide a quad mesh file
    Subdivide {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Number of subdivision levels
        #[arg(short, long, default_value = "1")]
        levels: usize,

        /// Treatment of open boundary edges
        #[arg(short, long, value_enum, default_value = "generic")]
        boundary: Boundary,

        /// Rescale new points to their parents' mean distance from the origin
        #[arg(long)]
        sphere: bool,
    },

    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Boundary {
    /// Interior rules with the actual face count as divisor
    Generic,
    /// Reject meshes with open boundaries
    Closed,
}

impl From<Boundary> for BoundaryRule {
    fn from(b: Boundary) -> Self {
        match b {
            Boundary::Generic => BoundaryRule::Generic,
            Boundary::Closed => BoundaryRule::Closed,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cube {
            output,
            half_extent,
            levels,
            boundary,
            midpoint_edges,
            sphere,
        } => {
            cmd_cube(&output, half_extent, levels, boundary, midpoint_edges, sphere)?;
        }

        Commands::Subdivide {
            input,
            output,
            levels,
            boundary,
            sphere,
        } => {
            cmd_subdivide(&input, &output, levels, boundary, sphere)?;
        }

        Commands::Info { input } => {
            cmd_info(&input)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let percent = if current >= total {
            100
        } else {
            (current * 100) / total
        };

        // Only redraw when the bar advances
        let previous = max_percent.fetch_max(percent, Ordering::Relaxed);
        if percent <= previous && percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        eprint!(
            "\r[{}{}] {:3}% {}",
            "=".repeat(filled),
            " ".repeat(bar_width - filled),
            percent,
            message
        );
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn refine_and_save(
    mesh: &QuadMesh,
    output: &Path,
    levels: usize,
    boundary: Boundary,
    sphere: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = SubdivideOptions::new(levels)
        .with_boundary_rule(boundary.into())
        .with_sphere_projection(sphere);
    let progress = create_progress();

    println!("Applying Catmull-Clark subdivision ({} levels)...", levels);
    let start = Instant::now();
    let refined = subdivide::catmull_clark_subdivide_with_progress(mesh, &options, &progress)?;
    let elapsed = start.elapsed();

    println!(
        "Result: {} vertices, {} edges, {} faces",
        refined.num_vertices(),
        refined.num_edges(),
        refined.num_faces()
    );
    io::save(&refined, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_cube(
    output: &Path,
    half_extent: f32,
    levels: usize,
    boundary: Boundary,
    midpoint_edges: bool,
    sphere: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = build_base_mesh(&BaseShape::Cube { half_extent })?;
    if midpoint_edges {
        let (vertices, faces) = to_face_vertex(&mesh);
        mesh = build_from_quads_with(&vertices, &faces, EdgeIdentity::Midpoint)?;
    }
    log::info!("built cube with half-extent {}", half_extent);

    refine_and_save(&mesh, output, levels, boundary, sphere)
}

fn cmd_subdivide(
    input: &Path,
    output: &Path,
    levels: usize,
    boundary: Boundary,
    sphere: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;
    println!(
        "Loaded: {} vertices, {} faces",
        mesh.num_vertices(),
        mesh.num_faces()
    );

    refine_and_save(&mesh, output, levels, boundary, sphere)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Edges: {}", mesh.num_edges());
    println!("Faces: {}", mesh.num_faces());
    println!("Euler characteristic: {}", mesh.euler_characteristic());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    let boundary = mesh.boundary_edges().count();
    if boundary == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary edges)", boundary);
    }

    let max_valence = mesh.vertex_ids().map(|v| mesh.valence(v)).max().unwrap_or(0);
    println!("Max valence: {}", max_valence);

    Ok(())
}
