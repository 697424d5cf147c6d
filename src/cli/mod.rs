//! Command-line parsing for the log-normal percentile calculator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "lnp",
    version,
    about = "Log-normal percentile calculator: two known percentiles in, the third out"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit the distribution from two percentile values, print the resolved
    /// percentiles, and optionally plot/export.
    Fit(FitArgs),
    /// Plot a previously exported fit JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying fit pipeline as `lnp fit`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(FitArgs),
}

/// Common options for fitting.
///
/// Exactly two of `--p50` / `--p80` / `--p95` must be given; the third
/// percentile is what the tool computes. (In `tui` mode the flags are
/// optional and merely seed the initial values.)
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Value at the 50th percentile ("typical" outcome).
    #[arg(long, value_name = "VALUE")]
    pub p50: Option<f64>,

    /// Value at the 80th percentile ("serious" outcome).
    #[arg(long, value_name = "VALUE")]
    pub p80: Option<f64>,

    /// Value at the 95th percentile ("extreme" outcome).
    #[arg(long, value_name = "VALUE")]
    pub p95: Option<f64>,

    /// Number of density samples for plotting.
    #[arg(long, default_value_t = 500)]
    pub samples: usize,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the resolved percentiles to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the fit (params + points + density grid) to JSON.
    #[arg(long = "export-fit")]
    pub export_fit: Option<PathBuf>,
}

/// Options for plotting a saved fit.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Fit JSON file produced by `lnp fit --export-fit`.
    #[arg(long, value_name = "JSON")]
    pub fit: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
