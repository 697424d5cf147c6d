//! Shared "fit pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! observations -> fit/resolve -> density grid
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::domain::{DensityGrid, FitConfig, Resolution};
use crate::error::AppError;
use crate::fit;

/// All computed outputs of a single fit run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub resolution: Resolution,
    pub grid: DensityGrid,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let resolution = fit::resolve(&config.obs1, &config.obs2)?;
    let grid = density_grid(&resolution, config.grid_points);
    Ok(RunOutput { resolution, grid })
}

/// Sample the fitted density over a plotting range derived from the three
/// resolved values: from half the smallest value (floored at 1e-3, the
/// density is only supported on x > 0) to 1.5x the largest.
pub fn density_grid(resolution: &Resolution, n: usize) -> DensityGrid {
    let n = n.max(2);

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for p in &resolution.points {
        lo = lo.min(p.value);
        hi = hi.max(p.value);
    }

    let mut x_min = (lo * 0.5).max(1e-3);
    let mut x_max = hi * 1.5;
    if !(x_min.is_finite() && x_max.is_finite()) || x_max <= x_min {
        x_min = 1e-3;
        x_max = 1.0;
    }

    let mut x = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        x.push(x_min + u * (x_max - x_min));
    }
    let pdf = fit::density(&resolution.fit.params, &x);

    DensityGrid { x, pdf }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Observation, Percentile};

    #[test]
    fn grid_spans_half_min_to_three_halves_max() {
        let res = fit::resolve(
            &Observation::new(Percentile::P50, 100.0),
            &Observation::new(Percentile::P80, 150.0),
        )
        .unwrap();
        let grid = density_grid(&res, 500);

        assert_eq!(grid.x.len(), 500);
        assert_eq!(grid.pdf.len(), 500);
        assert!((grid.x[0] - 50.0).abs() < 1e-9);
        // The largest resolved value is the derived p95 (> 150).
        let max_value = res.points.iter().map(|p| p.value).fold(f64::MIN, f64::max);
        assert!((grid.x[499] - max_value * 1.5).abs() < 1e-9);
        assert!(grid.x.windows(2).all(|w| w[0] < w[1]));
        assert!(grid.pdf.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn grid_floor_keeps_x_positive() {
        let res = fit::resolve(
            &Observation::new(Percentile::P50, 0.001),
            &Observation::new(Percentile::P80, 0.002),
        )
        .unwrap();
        let grid = density_grid(&res, 100);
        assert!(grid.x[0] >= 1e-3);
    }
}
