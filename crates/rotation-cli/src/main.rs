//! rotation-assign CLI - Intern Rotation Scheduling Engine
//!
//! Command-line interface for loading a rotation catalog, solving the
//! assignment model, and emitting the resulting schedule and summaries.

mod catalog;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rotation_core::SolveConfig;
use rotation_solver::solve;

#[derive(Parser)]
#[command(name = "rotation-assign")]
#[command(author, version, about = "Intern rotation scheduling engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a rotation catalog and print the resulting schedule.
    Solve {
        /// Path to the rotation catalog CSV file.
        #[arg(value_name = "CATALOG")]
        catalog: PathBuf,

        /// Number of interns (W).
        #[arg(short, long, env = "ROTATION_WORKERS")]
        workers: i64,

        /// Per-intern cap on total months spent in any external placement.
        #[arg(long, env = "ROTATION_EXTERNAL_CAP", default_value_t = SolveConfig::default().external_cap)]
        external_cap: u32,

        /// Big-M constant for the out1 exclusivity constraint.
        #[arg(long, env = "ROTATION_BIG_M", default_value_t = SolveConfig::default().big_m)]
        big_m: i32,

        /// Wall-clock budget (ms) handed to the solver per solve attempt.
        #[arg(long, env = "ROTATION_TIME_BUDGET_MS", default_value_t = SolveConfig::default().solver_time_budget_ms)]
        time_budget_ms: u64,

        /// Output format: text or json.
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            catalog,
            workers,
            external_cap,
            big_m,
            time_budget_ms,
            format,
        } => cmd_solve(&catalog, workers, external_cap, big_m, time_budget_ms, &format),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_solve(
    catalog_path: &std::path::Path,
    workers: i64,
    external_cap: u32,
    big_m: i32,
    time_budget_ms: u64,
    format: &str,
) -> Result<()> {
    let rotations = catalog::load_catalog(catalog_path).context("loading rotation catalog")?;
    let num_interns = catalog::validate_worker_count(workers).context("validating worker count")?;

    let config = SolveConfig {
        external_cap,
        big_m,
        solver_time_budget_ms: time_budget_ms,
    };

    let result = solve(rotations, num_interns, config);

    match (result.assignment, result.per_intern_counts, result.per_month_counts) {
        (Some(assignment), Some(per_intern), Some(per_month)) => {
            match format {
                "json" => {
                    let report = report::Report {
                        assignment: &assignment,
                        per_intern_counts: &per_intern,
                        per_month_counts: &per_month,
                    };
                    println!("{}", report::render_json(&report)?);
                }
                _ => {
                    print!("{}", report::render_text(&assignment));
                }
            }
            Ok(())
        }
        _ => {
            let message = result.error_log.unwrap_or_else(|| "solve failed with no error log".to_string());
            anyhow::bail!(message);
        }
    }
}
