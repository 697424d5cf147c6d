//! Read/write fit JSON files.
//!
//! Fit JSON is the "portable" representation of a fitted distribution:
//! - the underlying normal parameters (μ, σ) and the consistency flag
//! - the three resolved (percentile, value) points
//! - a precomputed density grid for quick plotting
//!
//! The schema is defined by `domain::FitFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{DensityGrid, FitFile, Resolution};
use crate::error::AppError;

/// Write a fit JSON file.
pub fn write_fit_json(path: &Path, resolution: &Resolution, grid: &DensityGrid) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create fit JSON '{}': {e}", path.display())))?;

    let out = FitFile {
        tool: "lnp".to_string(),
        fit: resolution.fit,
        points: resolution.points.to_vec(),
        grid: grid.clone(),
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::new(2, format!("Failed to write fit JSON: {e}")))?;

    Ok(())
}

/// Read a fit JSON file.
pub fn read_fit_json(path: &Path) -> Result<FitFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open fit JSON '{}': {e}", path.display())))?;
    let fit: FitFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid fit JSON: {e}")))?;
    Ok(fit)
}
