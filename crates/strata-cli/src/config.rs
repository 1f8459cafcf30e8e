//! Slice settings from a TOML profile plus command-line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use strata_slicer::SliceSettings;

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub layer_thickness: Option<f64>,
    pub layer_count: Option<usize>,
    pub initial_layer_thickness: Option<f64>,
    pub auto_count: bool,
}

/// Parse a TOML profile. Missing keys fall back to defaults.
pub fn parse_profile(text: &str) -> Result<SliceSettings> {
    toml::from_str(text).context("invalid slice profile")
}

/// Read a TOML profile from disk.
pub fn load_profile(path: &Path) -> Result<SliceSettings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile {}", path.display()))?;
    parse_profile(&text).with_context(|| format!("in {}", path.display()))
}

/// Merge `base` with `overrides`.
///
/// With `auto_count`, the layer count is derived from `mesh_height`.
pub fn resolve(base: SliceSettings, overrides: &Overrides, mesh_height: f64) -> SliceSettings {
    let mut settings = base;
    if let Some(t) = overrides.layer_thickness {
        settings.layer_thickness = t;
    }
    if let Some(t) = overrides.initial_layer_thickness {
        settings.initial_layer_thickness = t;
    }
    if let Some(n) = overrides.layer_count {
        settings.layer_count = n;
    }
    if overrides.auto_count {
        settings = SliceSettings::for_height(
            mesh_height,
            settings.layer_thickness,
            settings.initial_layer_thickness,
        );
    }
    settings
}
