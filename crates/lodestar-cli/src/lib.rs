//! CLI logic for the Lodestar layout tool.
//!
//! Reads a graph snapshot and a layout request, settles the requested layout
//! headlessly and writes the snapshot back with the final node positions.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, path::Path};

use log::{info, warn};
use serde::de::DeserializeOwned;

use lodestar::{LayoutEngine, LodestarError, scatter_positions};
use lodestar_core::{context::GraphContext, graph::GraphSnapshot, request::LayoutRequest};
use lodestar_parser::error::ParseError;

/// Largest offset applied when separating nodes that share a position.
const SCATTER_RADIUS: f32 = 1.0;

/// Run the Lodestar CLI application
///
/// Parses the request against the snapshot, compiles it, runs frames until
/// the layout settles or the frame budget is spent, and writes the snapshot
/// with updated positions to the output file.
///
/// # Errors
///
/// Returns `LodestarError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed snapshot or request files
/// - Rejected requests when `--strict` is set
/// - Layouts that cannot be compiled, not even as the default layout
pub fn run(args: &Args) -> Result<(), LodestarError> {
    info!(
        input_path = args.input,
        request_path = args.request,
        output_path = args.output;
        "Processing layout"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(time_step) = args.time_step {
        app_config.simulation = app_config.simulation.with_time_step(time_step);
    }
    let max_frames = args
        .max_frames
        .unwrap_or_else(|| app_config.simulation.iterations());

    let mut snapshot: GraphSnapshot = read_toml(&args.input)?;
    let request: LayoutRequest = read_toml(&args.request)?;

    let moved = scatter_positions(snapshot.nodes_mut(), args.seed, SCATTER_RADIUS);
    if moved > 0 {
        info!(moved, seed = args.seed; "Separated nodes sharing a position");
    }

    let mut engine = LayoutEngine::new(app_config);
    let context = GraphContext::from_snapshot(&snapshot);
    let outcome = engine.parser().parse_with_diagnostics(&request, &context);
    if outcome.is_fallback() && args.strict {
        return Err(ParseError::new(outcome.diagnostics().to_vec()).into());
    }
    if outcome.is_fallback() {
        warn!(
            diagnostics = outcome.diagnostics().len();
            "Request rejected, laying out with the default layout"
        );
    }

    let kind = engine.apply_layout(outcome.layout(), &snapshot)?;
    let report = engine.settle(snapshot.nodes_mut(), max_frames);
    match report {
        Some(report) => info!(
            kind = kind.as_str(),
            frames = report.iteration,
            energy = report.total_energy,
            converged = report.converged;
            "Simulation finished"
        ),
        None => info!(kind = kind.as_str(); "No frames simulated"),
    }

    let output =
        toml::to_string(&snapshot).map_err(|e| LodestarError::Serialization(e.to_string()))?;
    fs::write(&args.output, output)?;

    info!(output_file = args.output; "Layout exported successfully");

    Ok(())
}

/// Reads and deserializes a TOML file.
fn read_toml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, LodestarError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| LodestarError::Serialization(format!("{}: {e}", path.display())))
}
