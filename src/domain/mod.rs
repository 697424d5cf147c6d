//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the closed percentile enumeration (`Percentile`)
//! - user-supplied observations (`Observation`)
//! - fit outputs (`FittedParams`, `FitResult`, `Resolution`, etc.)
//! - run configuration (`FitConfig`) and the portable fit file schema

pub mod types;

pub use types::*;
