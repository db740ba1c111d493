//! Command-line interface for the Sojourn engine.
//!
//! `sojourn rank` ranks a candidate table for the travellers described in a
//! request file and prints the recommendation with its explanations as JSON.
//! `sojourn compare` explains why one kernel member outranks another.
//!
//! Paths and engine overrides can come from CLI flags, configuration files or
//! `SOJOURN_CMDS_*` environment variables.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod compare;
mod error;
mod rank;
mod request;

pub use error::CliError;

use compare::{CompareArgs, run_compare};
use rank::{RankArgs, run_rank};

const ARG_REQUEST: &str = "request";
const ARG_CANDIDATES: &str = "candidates";
const ARG_KERNEL_SIZE: &str = "kernel-size";
const ARG_GROUP_BLEND: &str = "group-blend";
const ARG_COMPROMISE_EXPONENT: &str = "compromise-exponent";
const ARG_TIE_TOLERANCE: &str = "tie-tolerance";
const ARG_PLACES_KEY: &str = "places-key";
const ARG_FIRST: &str = "first";
const ARG_SECOND: &str = "second";
const ENV_RANK_REQUEST: &str = "SOJOURN_CMDS_RANK_REQUEST";
const ENV_RANK_CANDIDATES: &str = "SOJOURN_CMDS_RANK_CANDIDATES";
const ENV_COMPARE_REQUEST: &str = "SOJOURN_CMDS_COMPARE_REQUEST";
const ENV_COMPARE_CANDIDATES: &str = "SOJOURN_CMDS_COMPARE_CANDIDATES";
const ENV_COMPARE_FIRST: &str = "SOJOURN_CMDS_COMPARE_FIRST";
const ENV_COMPARE_SECOND: &str = "SOJOURN_CMDS_COMPARE_SECOND";

/// Run the Sojourn CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration or inputs are invalid,
/// ranking fails, or the report cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Rank(args) => run_rank(args),
        Command::Compare(args) => run_compare(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "sojourn",
    about = "Sustainability-aware ranking of points of interest",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank a candidate table and explain the recommended kernel.
    Rank(RankArgs),
    /// Explain why one kernel member outranks another.
    Compare(CompareArgs),
}

#[cfg(test)]
mod tests;
