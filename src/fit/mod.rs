//! Percentile fitting.
//!
//! Responsibilities:
//!
//! - solve (μ, σ) of the underlying normal from two (probability, value) pairs
//! - evaluate quantiles and densities of the fitted log-normal
//! - resolve the missing third percentile

pub mod fitter;

pub use fitter::*;
