//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `lame_delegation` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use lame_delegation::config::Opt;
use lame_delegation::export::{export_csv, render_report};
use lame_delegation::initialization::init_logger_with;
use lame_delegation::{evaluate_exit_code, run_check, Config, RunMode, RunReport, ZoneOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config: Config = Opt::parse().into();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let report = match run_check(&config).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("lame_delegation error: {:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = write_output(&config, &report) {
        eprintln!("lame_delegation error: {:#}", e);
        process::exit(1);
    }

    process::exit(evaluate_exit_code(&config.fail_on, &report));
}

fn write_output(config: &Config, report: &RunReport) -> Result<()> {
    match report.mode {
        RunMode::Single => {
            for entry in &report.zones.entries {
                if let ZoneOutcome::Checked(check) = entry {
                    print!("{}", render_report(check));
                }
            }
            if let Some(path) = &config.output {
                let rows = export_csv(&report.zones, Some(path.as_path()))?;
                eprintln!("Wrote {} row{} to {}", rows, plural(rows), path.display());
            }
        }
        RunMode::Bulk => {
            let rows = export_csv(&report.zones, config.output.as_deref())?;
            let zones = &report.zones;
            eprintln!(
                "Checked {} zone{} ({}), {} row{} written",
                zones.len(),
                plural(zones.len()),
                zones.summary(),
                rows,
                plural(rows)
            );
            if let Some(path) = &config.output {
                eprintln!("Results saved in {}", path.display());
            }
        }
    }
    Ok(())
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
