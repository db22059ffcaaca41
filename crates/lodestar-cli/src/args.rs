//! Command-line argument definitions for the Lodestar CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the graph snapshot and layout request,
//! the output path, configuration file, simulation overrides and logging
//! verbosity.

use clap::Parser;

/// Command-line arguments for the Lodestar layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the graph snapshot (TOML)
    #[arg(help = "Path to the graph snapshot file")]
    pub input: String,

    /// Path to the layout request (TOML)
    #[arg(short, long)]
    pub request: String,

    /// Path to the output snapshot with settled positions (TOML)
    #[arg(short, long, default_value = "layout.toml")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Maximum number of frames to simulate; defaults to the configured
    /// iteration cap
    #[arg(long)]
    pub max_frames: Option<u32>,

    /// Time step per frame; defaults to the configured time step
    #[arg(long)]
    pub time_step: Option<f32>,

    /// Seed for separating nodes that start at the same position
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Fail on a rejected request instead of using the default layout
    #[arg(long)]
    pub strict: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
