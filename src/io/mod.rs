//! Input/output helpers.
//!
//! - fit JSON read/write (`fit_file`)
//! - resolved-percentile CSV export (`export`)

pub mod export;
pub mod fit_file;

pub use export::*;
pub use fit_file::*;
