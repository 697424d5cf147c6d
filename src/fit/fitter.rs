//! The numeric core: fit, quantile, density, resolve.
//!
//! Given two observations `(p_i, x_i)` with distinct percentiles, the
//! underlying normal satisfies `ln(x_i) = μ + σ·z_i` with `z_i = Φ⁻¹(p_i)`,
//! a two-equation linear system with the closed-form solution:
//!
//! ```text
//! σ = (ln x₂ − ln x₁) / (z₂ − z₁)
//! μ = ln x₁ − σ·z₁
//! ```
//!
//! Everything here is a pure function of its arguments: no caching, no
//! retained state, recomputed from scratch on every call.

use crate::domain::{
    ALL_PERCENTILES, FitResult, FittedParams, Observation, Percentile, ResolvedPoint, Resolution,
};
use crate::error::AppError;
use crate::math::{lognormal_pdf, norm_ppf};

/// Solve (μ, σ) from two observations.
///
/// Errors on non-positive values and on duplicate percentiles (`z₁ = z₂`
/// would divide by zero). A σ ≤ 0 result is *not* an error: the arithmetic
/// completed, the inputs were just non-monotone. It is flagged via
/// `FitResult::inconsistent` so callers can warn without losing the numbers.
pub fn fit(obs1: &Observation, obs2: &Observation) -> Result<FitResult, AppError> {
    for obs in [obs1, obs2] {
        if !obs.value.is_finite() || obs.value <= 0.0 {
            return Err(AppError::invalid_input(format!(
                "Value for {} must be greater than zero (got {}).",
                obs.percentile.display_name(),
                obs.value
            )));
        }
    }
    if obs1.percentile == obs2.percentile {
        return Err(AppError::invalid_input(format!(
            "The two observations must use different percentiles (both are {}).",
            obs1.percentile.display_name()
        )));
    }

    let z1 = norm_ppf(obs1.percentile.probability());
    let z2 = norm_ppf(obs2.percentile.probability());

    let sigma = (obs2.value.ln() - obs1.value.ln()) / (z2 - z1);
    let mu = obs1.value.ln() - sigma * z1;

    Ok(FitResult {
        params: FittedParams { mu, sigma },
        inconsistent: sigma <= 0.0,
    })
}

/// Value of the fitted log-normal at probability `p`: `exp(μ + σ·Φ⁻¹(p))`.
///
/// `p` must lie strictly inside (0, 1); Φ⁻¹ is undefined at the boundaries.
pub fn quantile(params: &FittedParams, p: f64) -> Result<f64, AppError> {
    if !(p > 0.0 && p < 1.0) {
        return Err(AppError::invalid_input(format!(
            "Probability must lie strictly between 0 and 1 (got {p})."
        )));
    }
    Ok((params.mu + params.sigma * norm_ppf(p)).exp())
}

/// Pointwise log-normal density over `xs`, for plotting.
///
/// `x ≤ 0` yields density 0, not an error.
pub fn density(params: &FittedParams, xs: &[f64]) -> Vec<f64> {
    xs.iter()
        .map(|&x| lognormal_pdf(x, params.mu, params.sigma))
        .collect()
}

/// Fit from two observations and infer the missing third percentile.
///
/// The returned points are ordered by increasing probability (50%, 80%, 95%)
/// regardless of input order, for stable downstream display.
pub fn resolve(obs1: &Observation, obs2: &Observation) -> Result<Resolution, AppError> {
    let fit = fit(obs1, obs2)?;

    let missing = Percentile::missing_from(obs1.percentile, obs2.percentile)
        .ok_or_else(|| AppError::invalid_input("The two observations must use different percentiles."))?;
    let missing_value = quantile(&fit.params, missing.probability())?;

    let value_for = |p: Percentile| -> (f64, bool) {
        if p == obs1.percentile {
            (obs1.value, false)
        } else if p == obs2.percentile {
            (obs2.value, false)
        } else {
            (missing_value, true)
        }
    };

    let points = ALL_PERCENTILES.map(|p| {
        let (value, derived) = value_for(p);
        ResolvedPoint {
            percentile: p,
            probability: p.probability(),
            value,
            derived,
        }
    });

    Ok(Resolution { fit, points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::norm_ppf;

    fn obs(p: Percentile, value: f64) -> Observation {
        Observation::new(p, value)
    }

    #[test]
    fn fit_typical_serious_pair() {
        // (p50, 100), (p80, 150): z for p50 is 0, so mu = ln(100) and
        // sigma = ln(1.5) / z(0.8).
        let fit = fit(&obs(Percentile::P50, 100.0), &obs(Percentile::P80, 150.0)).unwrap();
        assert!(!fit.inconsistent);
        assert!((fit.params.mu - 100.0_f64.ln()).abs() < 1e-9);
        assert!((fit.params.sigma - 1.5_f64.ln() / norm_ppf(0.8)).abs() < 1e-9);
        // Spot value: sigma ≈ 0.48177.
        assert!((fit.params.sigma - 0.48177).abs() < 1e-4);
    }

    #[test]
    fn resolve_infers_extreme_value() {
        // Continuing the scenario above, the missing p95 value is
        // 100 · exp(sigma · z(0.95)) ≈ 220.9.
        let res = resolve(&obs(Percentile::P50, 100.0), &obs(Percentile::P80, 150.0)).unwrap();
        let derived = res.derived_point();
        assert_eq!(derived.percentile, Percentile::P95);
        let expected = 100.0 * (res.fit.params.sigma * norm_ppf(0.95)).exp();
        assert!((derived.value - expected).abs() < 1e-9);
        assert!((derived.value - 220.9).abs() < 0.1);
    }

    #[test]
    fn sigma_positive_for_monotone_inputs() {
        let pairs = [
            (Percentile::P50, 10.0, Percentile::P80, 11.0),
            (Percentile::P50, 1.0, Percentile::P95, 400.0),
            (Percentile::P80, 0.2, Percentile::P95, 0.3),
        ];
        for (pa, xa, pb, xb) in pairs {
            let fit = fit(&obs(pa, xa), &obs(pb, xb)).unwrap();
            assert!(fit.params.sigma > 0.0, "expected sigma > 0 for ({xa}, {xb})");
            assert!(!fit.inconsistent);
        }
    }

    #[test]
    fn inconsistent_inputs_are_flagged_not_rejected() {
        // Higher percentile mapped to a smaller value: numerically valid,
        // semantically backwards.
        let fit = fit(&obs(Percentile::P50, 200.0), &obs(Percentile::P95, 100.0)).unwrap();
        assert!(fit.params.sigma < 0.0);
        assert!(fit.inconsistent);

        let res = resolve(&obs(Percentile::P50, 200.0), &obs(Percentile::P95, 100.0)).unwrap();
        assert!(res.fit.inconsistent);
    }

    #[test]
    fn nonpositive_value_is_rejected() {
        let err = fit(&obs(Percentile::P50, 0.0), &obs(Percentile::P80, 150.0)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        let err = fit(&obs(Percentile::P50, 100.0), &obs(Percentile::P80, -1.0)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn duplicate_percentile_is_rejected() {
        let err = fit(&obs(Percentile::P80, 100.0), &obs(Percentile::P80, 150.0)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn quantile_rejects_boundaries() {
        let params = FittedParams { mu: 1.0, sigma: 0.5 };
        assert!(quantile(&params, 0.0).is_err());
        assert!(quantile(&params, 1.0).is_err());
        assert!(quantile(&params, -0.2).is_err());
        assert!(quantile(&params, 1.7).is_err());
    }

    #[test]
    fn quantile_at_median_is_exp_mu() {
        // z(0.5) = 0 exactly, so the median is exp(mu).
        let params = FittedParams { mu: 1.0, sigma: 0.5 };
        let v = quantile(&params, 0.5).unwrap();
        assert!((v - 1.0_f64.exp()).abs() < 1e-12);
    }

    #[test]
    fn round_trip_recovers_parameters() {
        // quantile -> re-fit recovers (mu, sigma) within 1e-9 relative.
        let params = FittedParams { mu: 4.2, sigma: 0.8 };
        let x50 = quantile(&params, 0.5).unwrap();
        let x95 = quantile(&params, 0.95).unwrap();

        let refit = fit(&obs(Percentile::P50, x50), &obs(Percentile::P95, x95)).unwrap();
        assert!((refit.params.mu - params.mu).abs() / params.mu.abs() < 1e-9);
        assert!((refit.params.sigma - params.sigma).abs() / params.sigma < 1e-9);
    }

    #[test]
    fn resolve_is_order_independent_and_idempotent() {
        let a = obs(Percentile::P80, 150.0);
        let b = obs(Percentile::P95, 300.0);

        let r1 = resolve(&a, &b).unwrap();
        let r2 = resolve(&b, &a).unwrap();
        let r3 = resolve(&a, &b).unwrap();

        assert_eq!(r1, r3);
        // Same points in the same (probability) order either way.
        for (p1, p2) in r1.points.iter().zip(r2.points.iter()) {
            assert_eq!(p1.percentile, p2.percentile);
            assert!((p1.value - p2.value).abs() < 1e-12);
            assert_eq!(p1.derived, p2.derived);
        }
        assert_eq!(r1.points[0].percentile, Percentile::P50);
        assert_eq!(r1.points[1].percentile, Percentile::P80);
        assert_eq!(r1.points[2].percentile, Percentile::P95);
    }

    #[test]
    fn density_zero_left_of_origin() {
        let params = FittedParams { mu: 0.0, sigma: 1.0 };
        let pdf = density(&params, &[-1.0, 0.0, 1.0]);
        assert_eq!(pdf[0], 0.0);
        assert_eq!(pdf[1], 0.0);
        assert!(pdf[2] > 0.0);
    }

    #[test]
    fn missing_from_covers_all_pairs() {
        assert_eq!(
            Percentile::missing_from(Percentile::P50, Percentile::P80),
            Some(Percentile::P95)
        );
        assert_eq!(
            Percentile::missing_from(Percentile::P95, Percentile::P50),
            Some(Percentile::P80)
        );
        assert_eq!(
            Percentile::missing_from(Percentile::P80, Percentile::P95),
            Some(Percentile::P50)
        );
        assert_eq!(Percentile::missing_from(Percentile::P80, Percentile::P80), None);
    }
}
