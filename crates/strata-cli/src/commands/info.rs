//! strata info - mesh statistics.

use std::path::Path;

use anyhow::{bail, Result};
use colored::Colorize;
use serde::Serialize;

use crate::{load, Cli, OutputFormat};

#[derive(Serialize)]
struct MeshInfo {
    path: String,
    vertices: usize,
    faces: usize,
    boundary_edges: usize,
    bounds_min: [f64; 3],
    bounds_max: [f64; 3],
}

pub fn run(input: &Path, cli: &Cli) -> Result<()> {
    let mesh = load::load_mesh(input)?;
    let Some((lo, hi)) = mesh.bounds() else {
        bail!("mesh has no vertices");
    };

    let info = MeshInfo {
        path: input.display().to_string(),
        vertices: mesh.num_vertices(),
        faces: mesh.num_faces(),
        boundary_edges: mesh.boundary_edge_count(),
        bounds_min: [lo.x, lo.y, lo.z],
        bounds_max: [hi.x, hi.y, hi.z],
    };

    if cli.quiet {
        return Ok(());
    }

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
        OutputFormat::Text => {
            println!("{}", "Mesh Information".bold().underline());
            println!("  {}: {}", "File".cyan(), info.path);
            println!("  {}: {}", "Vertices".cyan(), info.vertices);
            println!("  {}: {}", "Faces".cyan(), info.faces);
            let edges = if info.boundary_edges == 0 {
                "0 (closed)".green()
            } else {
                info.boundary_edges.to_string().yellow()
            };
            println!("  {}: {}", "Boundary edges".cyan(), edges);
            println!(
                "  {}: ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
                "Bounds".cyan(),
                lo.x,
                lo.y,
                lo.z,
                hi.x,
                hi.y,
                hi.z
            );
        }
    }

    Ok(())
}
