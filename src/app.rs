//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - validates the two supplied percentile values
//! - runs the fit pipeline
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, FitArgs, PlotArgs};
use crate::domain::{FitConfig, Observation, Percentile};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `lnp` binary.
pub fn run() -> Result<(), AppError> {
    // We want `lnp` and `lnp --p50 100` to behave like `lnp tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args)?;
    let run = pipeline::run_fit(&config)?;

    println!("{}", crate::report::format_fit_summary(&run.resolution));
    println!("{}", crate::report::format_percentile_table(&run.resolution));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.resolution,
            &run.grid,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.resolution)?;
    }
    if let Some(path) = &config.export_fit {
        crate::io::fit_file::write_fit_json(path, &run.resolution, &run.grid)?;
    }

    Ok(())
}

fn handle_tui(args: FitArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let fit = crate::io::fit_file::read_fit_json(&args.fit)?;
    let plot = crate::plot::render_ascii_plot_from_fit_file(&fit, args.width, args.height);
    println!("{plot}");
    Ok(())
}

/// Extract the two observations from the value flags.
///
/// Exactly two of the three must be present; anything else is invalid input.
pub fn observations_from_args(args: &FitArgs) -> Result<(Observation, Observation), AppError> {
    let mut given: Vec<Observation> = Vec::new();
    for (percentile, value) in [
        (Percentile::P50, args.p50),
        (Percentile::P80, args.p80),
        (Percentile::P95, args.p95),
    ] {
        if let Some(value) = value {
            given.push(Observation::new(percentile, value));
        }
    }

    match given.as_slice() {
        [a, b] => Ok((*a, *b)),
        _ => Err(AppError::invalid_input(format!(
            "Exactly two of --p50/--p80/--p95 must be given ({} supplied); the third is computed.",
            given.len()
        ))),
    }
}

pub fn fit_config_from_args(args: &FitArgs) -> Result<FitConfig, AppError> {
    let (obs1, obs2) = observations_from_args(args)?;
    Ok(FitConfig {
        obs1,
        obs2,
        grid_points: args.samples.max(2),
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
        export_fit: args.export_fit.clone(),
    })
}

/// Rewrite argv so `lnp` defaults to `lnp tui`.
///
/// Rules:
/// - `lnp`                     -> `lnp tui`
/// - `lnp --p50 100 ...`       -> `lnp tui --p50 100 ...`
/// - `lnp --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> FitArgs {
        FitArgs {
            p50: None,
            p80: None,
            p95: None,
            samples: 500,
            plot: true,
            no_plot: false,
            width: 100,
            height: 25,
            export: None,
            export_fit: None,
        }
    }

    #[test]
    fn two_values_build_two_observations() {
        let mut args = base_args();
        args.p50 = Some(100.0);
        args.p95 = Some(250.0);

        let (a, b) = observations_from_args(&args).unwrap();
        assert_eq!(a.percentile, Percentile::P50);
        assert_eq!(b.percentile, Percentile::P95);
        assert_eq!(a.value, 100.0);
        assert_eq!(b.value, 250.0);
    }

    #[test]
    fn one_or_three_values_are_rejected() {
        let mut args = base_args();
        args.p80 = Some(150.0);
        assert_eq!(observations_from_args(&args).unwrap_err().exit_code(), 2);

        args.p50 = Some(100.0);
        args.p95 = Some(250.0);
        assert_eq!(observations_from_args(&args).unwrap_err().exit_code(), 2);

        assert_eq!(observations_from_args(&base_args()).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        let argv = rewrite_args(vec!["lnp".to_string()]);
        assert_eq!(argv, vec!["lnp".to_string(), "tui".to_string()]);

        let argv = rewrite_args(vec!["lnp".to_string(), "--p50".to_string(), "100".to_string()]);
        assert_eq!(argv[1], "tui");

        let argv = rewrite_args(vec!["lnp".to_string(), "fit".to_string()]);
        assert_eq!(argv[1], "fit");

        let argv = rewrite_args(vec!["lnp".to_string(), "--help".to_string()]);
        assert_eq!(argv[1], "--help");
    }
}
