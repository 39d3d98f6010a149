//! Command-line interface for planning Sortie flights.
//!
//! `sortie solve <problem.json>` loads a planning record, builds the standard
//! routing model, runs the routing engine (or evaluates initial routes from a
//! file) and prints per-aircraft route tables or a JSON report.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod input;
mod output;
mod solve;

pub use error::CliError;
pub use output::OutputFormat;

use solve::{SolveArgs, run_solve};

pub(crate) const ARG_SOLVE_PROBLEM: &str = "problem";
pub(crate) const ARG_SOLVE_FORMAT: &str = "format";
pub(crate) const ARG_SOLVE_COLUMNS: &str = "columns";
pub(crate) const ARG_SOLVE_TIME_LIMIT: &str = "time-limit-secs";
pub(crate) const ARG_SOLVE_MAX_GENERATIONS: &str = "max-generations";
pub(crate) const ARG_SOLVE_INITIAL_ROUTES: &str = "initial-routes";
pub(crate) const ENV_SOLVE_PROBLEM: &str = "SORTIE_CMDS_SOLVE_PROBLEM_PATH";

/// Run the Sortie CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Solve(args) => run_solve(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "sortie",
    about = "Pickup-and-delivery flight planning with reload checkpoints",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan routes for a problem record and print the itineraries.
    Solve(SolveArgs),
}

#[cfg(test)]
mod tests;
