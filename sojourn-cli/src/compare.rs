//! `compare` command: explain why one kernel member outranks another.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sojourn_core::{RankedCandidate, Recommendation};
use sojourn_outrank::{Explainer, PairwiseExplanation};

use crate::request::{EngineOverrides, Sources, write_json};
use crate::{
    ARG_CANDIDATES, ARG_FIRST, ARG_KERNEL_SIZE, ARG_REQUEST, ARG_SECOND, ARG_TIE_TOLERANCE,
    CliError, ENV_COMPARE_CANDIDATES, ENV_COMPARE_FIRST, ENV_COMPARE_REQUEST, ENV_COMPARE_SECOND,
};

/// CLI arguments for the `compare` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "compare",
    long_about = "Rank the table exactly as `rank` does, then explain the \
                 share gaps between two kernel members. The better-ranked of \
                 the two is reported as the winner whichever order they are \
                 given in.",
    about = "Explain why one kernel member outranks another"
)]
#[ortho_config(prefix = "SOJOURN")]
pub(crate) struct CompareArgs {
    /// Path to a JSON request with `travelers` and optional `config`.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request: Option<Utf8PathBuf>,
    /// Path to the JSON candidate table.
    #[arg(long = ARG_CANDIDATES, value_name = "path")]
    #[serde(default)]
    pub(crate) candidates: Option<Utf8PathBuf>,
    /// Name of the first kernel member.
    #[arg(long = ARG_FIRST, value_name = "name")]
    #[serde(default)]
    pub(crate) first: Option<String>,
    /// Name of the second kernel member.
    #[arg(long = ARG_SECOND, value_name = "name")]
    #[serde(default)]
    pub(crate) second: Option<String>,
    /// Number of kernel members to consider.
    #[arg(long = ARG_KERNEL_SIZE, value_name = "count")]
    #[serde(default)]
    pub(crate) kernel_size: Option<usize>,
    /// Tie tolerance, in percentage points.
    #[arg(long = ARG_TIE_TOLERANCE, value_name = "pp")]
    #[serde(default)]
    pub(crate) tie_tolerance: Option<f64>,
}

impl CompareArgs {
    pub(crate) fn into_config(self) -> Result<CompareConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        CompareConfig::try_from(merged)
    }
}

/// Resolved `compare` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CompareConfig {
    pub(crate) sources: Sources,
    pub(crate) first: String,
    pub(crate) second: String,
    pub(crate) overrides: EngineOverrides,
}

impl TryFrom<CompareArgs> for CompareConfig {
    type Error = CliError;

    fn try_from(args: CompareArgs) -> Result<Self, Self::Error> {
        let request = args.request.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_COMPARE_REQUEST,
        })?;
        let candidates = args.candidates.ok_or(CliError::MissingArgument {
            field: ARG_CANDIDATES,
            env: ENV_COMPARE_CANDIDATES,
        })?;
        let first = args.first.ok_or(CliError::MissingArgument {
            field: ARG_FIRST,
            env: ENV_COMPARE_FIRST,
        })?;
        let second = args.second.ok_or(CliError::MissingArgument {
            field: ARG_SECOND,
            env: ENV_COMPARE_SECOND,
        })?;
        Ok(Self {
            sources: Sources {
                request,
                candidates,
            },
            first,
            second,
            overrides: EngineOverrides {
                kernel_size: args.kernel_size,
                tie_tolerance: args.tie_tolerance,
                ..EngineOverrides::default()
            },
        })
    }
}

/// Output of the `compare` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CompareReport {
    pub(crate) text: String,
    pub(crate) explanation: PairwiseExplanation,
}

pub(crate) fn run_compare(args: CompareArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_compare_with(args, &mut stdout)
}

pub(crate) fn run_compare_with(args: CompareArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.sources.validate()?;
    let report = execute_compare(&config)?;
    write_json(writer, &report)
}

pub(crate) fn execute_compare(config: &CompareConfig) -> Result<CompareReport, CliError> {
    let (recommendation, engine) = config.sources.recommend(config.overrides)?;
    let first = kernel_member(&recommendation, &config.first)?;
    let second = kernel_member(&recommendation, &config.second)?;
    let (winner, loser) = if (second.rank, second.name()) < (first.rank, first.name()) {
        (second, first)
    } else {
        (first, second)
    };
    let explanation = Explainer::new(&engine)?.compare(&winner.candidate, &loser.candidate);
    Ok(CompareReport {
        text: explanation.to_string(),
        explanation,
    })
}

fn kernel_member<'a>(
    recommendation: &'a Recommendation,
    name: &str,
) -> Result<&'a RankedCandidate, CliError> {
    recommendation
        .kernel_member(name)
        .ok_or_else(|| CliError::NotInKernel {
            name: name.to_owned(),
        })
}
