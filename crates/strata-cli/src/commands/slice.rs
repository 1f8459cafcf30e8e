//! strata slice - cut a mesh into layer contours.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use strata_slicer::{SliceResult, SliceSettings, Slicer};
use tracing::warn;

use crate::config::{self, Overrides};
use crate::{load, Cli, OutputFormat};

#[derive(Serialize)]
struct SliceSummary {
    path: String,
    settings: SliceSettings,
    total_layers: usize,
    closed_contours: usize,
    open_contours: usize,
    open_layers: Vec<usize>,
    max_layer_area: f64,
}

impl SliceSummary {
    fn new(path: &Path, settings: SliceSettings, result: &SliceResult) -> Self {
        let closed_contours = result.layers.iter().map(|l| l.closed_polygons.len()).sum();
        let open_contours = result.layers.iter().map(|l| l.open_polygons.len()).sum();
        let max_layer_area = result
            .layers
            .iter()
            .map(|l| l.closed_polygons.total_area().abs())
            .fold(0.0, f64::max);
        Self {
            path: path.display().to_string(),
            settings,
            total_layers: result.layers.len(),
            closed_contours,
            open_contours,
            open_layers: result.open_layer_indices(),
            max_layer_area,
        }
    }
}

pub fn run(
    input: &Path,
    profile: Option<&Path>,
    overrides: &Overrides,
    output: Option<&Path>,
    sequential: bool,
    cli: &Cli,
) -> Result<()> {
    let mesh = load::load_mesh(input)?;

    let base = match profile {
        Some(path) => config::load_profile(path)?,
        None => SliceSettings::default(),
    };
    let height = mesh.z_extent().map(|(_, hi)| hi.max(0.0)).unwrap_or(0.0);
    let settings = config::resolve(base, overrides, height);

    let slicer = Slicer::new(&mesh, &settings).context("cannot slice mesh")?;
    let result = if sequential {
        slicer.slice_sequential()
    } else {
        slicer.slice()
    };

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    let summary = SliceSummary::new(input, settings, &result);
    if !summary.open_layers.is_empty() {
        warn!(
            layers = summary.open_layers.len(),
            "some layers contain unclosed contours and need repair"
        );
    }

    if cli.quiet {
        return Ok(());
    }

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => {
            println!("{}", "Slice Information".bold().underline());
            println!("  {}: {}", "File".cyan(), summary.path);
            println!(
                "  {}: {:.3} (first {:.3})",
                "Layer thickness".cyan(),
                settings.layer_thickness,
                settings.initial_layer_thickness
            );
            println!("  {}: {}", "Total layers".cyan(), summary.total_layers);
            println!("  {}: {}", "Closed contours".cyan(), summary.closed_contours);
            println!("  {}: {:.3}", "Largest layer area".cyan(), summary.max_layer_area);
            if summary.open_layers.is_empty() {
                println!("  {}: {}", "Open contours".cyan(), "none".green());
            } else {
                println!(
                    "  {}: {} on layers {:?}",
                    "Open contours".cyan(),
                    summary.open_contours.to_string().yellow(),
                    summary.open_layers
                );
            }
            if let Some(path) = output {
                println!("  {}: {}", "Written".cyan(), path.display());
            }
        }
    }

    Ok(())
}
