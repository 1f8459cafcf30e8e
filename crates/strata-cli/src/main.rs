//! strata - slice triangle meshes into layer contours.
//!
//! # Logging
//!
//! Set `RUST_LOG` to control log output, or pass `-v` / `-vv`:
//! - `RUST_LOG=strata_slicer=info` - job summaries and open-contour warnings
//! - `RUST_LOG=strata_slicer=debug` - per-layer segment and contour counts
//!
//! # Example
//!
//! ```bash
//! strata slice part.stl --layer-thickness 0.2 --auto-count -o layers.json
//! strata slice part.stl --config profile.toml --format json
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod load;

use commands::{info, slice};

/// Cut STL or JSON meshes into per-layer closed and open contours.
#[derive(Parser)]
#[command(name = "strata", version, about)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// How the mesh or slice report is printed
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Suppress reports, log output and error messages
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log slicer progress: -v job summary, -vv each layer, -vvv chain dead-ends
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Report style shared by `info` and `slice`.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Coloured summary
    Text,
    /// Summary struct as pretty JSON
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh statistics
    Info {
        /// Input mesh file (.stl or .json)
        input: PathBuf,
    },

    /// Slice a mesh into layer contours
    Slice {
        /// Input mesh file (.stl or .json)
        input: PathBuf,

        /// TOML file with layer_thickness / layer_count / initial_layer_thickness
        #[arg(long)]
        config: Option<PathBuf>,

        /// Thickness of every layer after the first
        #[arg(long)]
        layer_thickness: Option<f64>,

        /// Number of layers
        #[arg(long, conflicts_with = "auto_count")]
        layer_count: Option<usize>,

        /// Thickness of the first layer
        #[arg(long)]
        initial_layer_thickness: Option<f64>,

        /// Derive the layer count from the mesh height
        #[arg(long)]
        auto_count: bool,

        /// Write all layers as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Process layers on the calling thread only
        #[arg(long)]
        sequential: bool,
    },
}

/// Log directives for the strata crates at a given `-v` count.
fn verbosity_directives(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,strata_slicer=info,strata_mesh=info",
        2 => "warn,strata_slicer=debug,strata_mesh=debug",
        _ => "warn,strata_slicer=trace,strata_mesh=trace",
    }
}

/// Logs go to stderr so `--format json` output on stdout stays parseable.
/// A set `RUST_LOG` replaces the `-v` directives.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_directives(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).compact())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Info { input } => info::run(input, &cli),
        Commands::Slice {
            input,
            config,
            layer_thickness,
            layer_count,
            initial_layer_thickness,
            auto_count,
            output,
            sequential,
        } => {
            let overrides = config::Overrides {
                layer_thickness: *layer_thickness,
                layer_count: *layer_count,
                initial_layer_thickness: *initial_layer_thickness,
                auto_count: *auto_count,
            };
            slice::run(
                input,
                config.as_deref(),
                &overrides,
                output.as_deref(),
                *sequential,
                &cli,
            )
        }
    };

    if let Err(e) = &result {
        if !cli.quiet {
            eprintln!("{}: {}", "Error".red().bold(), e);
            for cause in e.chain().skip(1) {
                eprintln!("  {}: {}", "Caused by".yellow(), cause);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
