//! Formatted terminal output for fit results.

use crate::domain::Resolution;

/// Format the fit summary: fitted parameters, the inferred percentile, and
/// a caution line when the inputs were non-monotone.
pub fn format_fit_summary(resolution: &Resolution) -> String {
    let mut out = String::new();

    out.push_str("=== lnp - Log-Normal Percentile Fit ===\n");
    out.push_str(&format!(
        "Underlying normal: mu={:.5} | sigma={:.5}\n",
        resolution.fit.params.mu, resolution.fit.params.sigma
    ));

    let derived = resolution.derived_point();
    out.push_str(&format!(
        "Inferred {}: {:.5}\n",
        derived.percentile.display_name(),
        derived.value
    ));

    if resolution.fit.inconsistent {
        out.push_str(
            "CAUTION: sigma <= 0 - the value at the higher percentile is not larger; \
             the fit is shown as computed but the inputs look inconsistent.\n",
        );
    }

    out
}

/// Format the three resolved percentiles as a fixed-width table.
pub fn format_percentile_table(resolution: &Resolution) -> String {
    let mut out = String::new();

    out.push_str(
        format!(
            "{:<16} {:>12} {:>14} {:<8}\n",
            "percentile", "probability", "value", "source"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!("{:-<16} {:-<12} {:-<14} {:-<8}\n", "", "", "", "").trim_end(),
    );
    out.push('\n');

    for p in &resolution.points {
        out.push_str(
            format!(
                "{:<16} {:>11.0}% {:>14.5} {:<8}\n",
                p.percentile.display_name(),
                p.probability * 100.0,
                p.value,
                if p.derived { "derived" } else { "given" },
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Observation, Percentile};
    use crate::fit::resolve;

    fn sample_resolution() -> Resolution {
        resolve(
            &Observation::new(Percentile::P50, 100.0),
            &Observation::new(Percentile::P80, 150.0),
        )
        .unwrap()
    }

    #[test]
    fn summary_names_parameters_and_derived_percentile() {
        let out = format_fit_summary(&sample_resolution());
        assert!(out.contains("mu="));
        assert!(out.contains("sigma="));
        assert!(out.contains("Extreme (95%)"));
        assert!(!out.contains("CAUTION"));
    }

    #[test]
    fn summary_warns_on_inconsistent_fit() {
        let res = resolve(
            &Observation::new(Percentile::P50, 200.0),
            &Observation::new(Percentile::P95, 100.0),
        )
        .unwrap();
        let out = format_fit_summary(&res);
        assert!(out.contains("CAUTION"));
    }

    #[test]
    fn table_lists_all_three_in_probability_order() {
        let out = format_percentile_table(&sample_resolution());
        let typical = out.find("Typical (50%)").unwrap();
        let serious = out.find("Serious (80%)").unwrap();
        let extreme = out.find("Extreme (95%)").unwrap();
        assert!(typical < serious && serious < extreme);
        assert_eq!(out.matches("given").count(), 2);
        assert_eq!(out.matches("derived").count(), 1);
    }
}
