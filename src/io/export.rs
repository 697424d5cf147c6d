//! Export resolved percentiles to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::Resolution;
use crate::error::AppError;

/// Write the three resolved percentiles (plus the fitted parameters) to a CSV file.
pub fn write_results_csv(path: &Path, resolution: &Resolution) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "percentile,probability,value,source,mu,sigma,inconsistent")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for p in &resolution.points {
        let percentile = format!("{:?}", p.percentile).to_lowercase();
        writeln!(
            file,
            "{},{:.2},{:.10},{},{:.10},{:.10},{}",
            percentile,
            p.probability,
            p.value,
            if p.derived { "derived" } else { "given" },
            resolution.fit.params.mu,
            resolution.fit.params.sigma,
            resolution.fit.inconsistent,
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
