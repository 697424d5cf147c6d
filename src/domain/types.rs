//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One of the three fixed percentiles the calculator works with.
///
/// The set is closed on purpose: the whole tool is built around the
/// "two of these three are given, the third is inferred" invariant, and a
/// fourth member would silently break `missing_from`. Variant order follows
/// increasing probability so the derived `Ord` sorts points for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Percentile {
    P50,
    P80,
    P95,
}

/// All members, in probability order.
pub const ALL_PERCENTILES: [Percentile; 3] = [Percentile::P50, Percentile::P80, Percentile::P95];

impl Percentile {
    /// The fixed probability this percentile stands for.
    pub fn probability(self) -> f64 {
        match self {
            Percentile::P50 => 0.50,
            Percentile::P80 => 0.80,
            Percentile::P95 => 0.95,
        }
    }

    /// Human-readable label for terminal output.
    ///
    /// Severity reading: the 50% value is the "typical" outcome, 80% a
    /// "serious" one, 95% an "extreme" one.
    pub fn display_name(self) -> &'static str {
        match self {
            Percentile::P50 => "Typical (50%)",
            Percentile::P80 => "Serious (80%)",
            Percentile::P95 => "Extreme (95%)",
        }
    }

    /// Single-character glyph used by the ASCII plot markers.
    pub fn marker(self) -> char {
        match self {
            Percentile::P50 => 'T',
            Percentile::P80 => 'S',
            Percentile::P95 => 'E',
        }
    }

    /// The one percentile not present in `{a, b}`, or `None` when `a == b`.
    pub fn missing_from(a: Percentile, b: Percentile) -> Option<Percentile> {
        if a == b {
            return None;
        }
        ALL_PERCENTILES.into_iter().find(|&p| p != a && p != b)
    }
}

/// A user-supplied (percentile, value) pair.
///
/// Values must be strictly positive for a log-normal variable; this is
/// enforced at the `fit` boundary, not here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub percentile: Percentile,
    pub value: f64,
}

impl Observation {
    pub fn new(percentile: Percentile, value: f64) -> Self {
        Self { percentile, value }
    }
}

/// Parameters of the normal distribution of the variable's logarithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedParams {
    pub mu: f64,
    pub sigma: f64,
}

/// Fit output: parameters plus the monotonicity advisory flag.
///
/// `inconsistent` is true when `sigma <= 0`, i.e. the value at the higher
/// percentile was not greater than the value at the lower one. The numbers
/// are still returned; the presentation layer decides how loudly to warn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub params: FittedParams,
    pub inconsistent: bool,
}

/// One of the three resolved (percentile, value) pairs.
///
/// `derived` marks the inferred third point (the one the user did not supply).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPoint {
    pub percentile: Percentile,
    pub probability: f64,
    pub value: f64,
    pub derived: bool,
}

/// Full output of `fit::resolve`: the fit plus all three points, ordered by
/// increasing probability regardless of input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub fit: FitResult,
    pub points: [ResolvedPoint; 3],
}

impl Resolution {
    /// The inferred point (exactly one per resolution).
    pub fn derived_point(&self) -> &ResolvedPoint {
        // The array always holds exactly one derived point by construction.
        self.points
            .iter()
            .find(|p| p.derived)
            .unwrap_or(&self.points[0])
    }
}

/// Density samples for plotting: parallel x / pdf vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityGrid {
    pub x: Vec<f64>,
    pub pdf: Vec<f64>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub obs1: Observation,
    pub obs2: Observation,

    /// Number of density samples for plotting.
    pub grid_points: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_fit: Option<PathBuf>,
}

/// A saved fit file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub fit: FitResult,
    pub points: Vec<ResolvedPoint>,
    pub grid: DensityGrid,
}
