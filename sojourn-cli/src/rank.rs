//! `rank` command: recommend a kernel and explain it.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sojourn_core::{PlaceMetadata, PlaceMetadataService, PlaceQuery, Recommendation};
use sojourn_data::HttpPlaceMetadataService;
use sojourn_outrank::{Attribution, DecidingFactor, Explainer};

use crate::request::{EngineOverrides, Sources, write_json};
use crate::{
    ARG_CANDIDATES, ARG_COMPROMISE_EXPONENT, ARG_GROUP_BLEND, ARG_KERNEL_SIZE, ARG_PLACES_KEY,
    ARG_REQUEST, ARG_TIE_TOLERANCE, CliError, ENV_RANK_CANDIDATES, ENV_RANK_REQUEST,
};

/// CLI arguments for the `rank` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "rank",
    long_about = "Rank a JSON candidate table for the travellers described in \
                 a request file. The request holds the traveller profiles and \
                 optional engine parameters; flags override those parameters.",
    about = "Rank candidates and explain the recommended kernel"
)]
#[ortho_config(prefix = "SOJOURN")]
pub(crate) struct RankArgs {
    /// Path to a JSON request with `travelers` and optional `config`.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request: Option<Utf8PathBuf>,
    /// Path to the JSON candidate table.
    #[arg(long = ARG_CANDIDATES, value_name = "path")]
    #[serde(default)]
    pub(crate) candidates: Option<Utf8PathBuf>,
    /// Number of kernel members to return.
    #[arg(long = ARG_KERNEL_SIZE, value_name = "count")]
    #[serde(default)]
    pub(crate) kernel_size: Option<usize>,
    /// Weight of the group consensus when blending preference fit.
    #[arg(long = ARG_GROUP_BLEND, value_name = "eta")]
    #[serde(default)]
    pub(crate) group_blend: Option<f64>,
    /// Exponent of the compromise utility.
    #[arg(long = ARG_COMPROMISE_EXPONENT, value_name = "rho")]
    #[serde(default)]
    pub(crate) compromise_exponent: Option<f64>,
    /// Tie tolerance for explanations, in percentage points.
    #[arg(long = ARG_TIE_TOLERANCE, value_name = "pp")]
    #[serde(default)]
    pub(crate) tie_tolerance: Option<f64>,
    /// API key enabling place metadata lookups for kernel members.
    #[arg(long = ARG_PLACES_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) places_key: Option<String>,
}

impl RankArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }
}

/// Resolved `rank` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RankConfig {
    pub(crate) sources: Sources,
    pub(crate) overrides: EngineOverrides,
    pub(crate) places_key: Option<String>,
}

impl TryFrom<RankArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: RankArgs) -> Result<Self, Self::Error> {
        let request = args.request.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_RANK_REQUEST,
        })?;
        let candidates = args.candidates.ok_or(CliError::MissingArgument {
            field: ARG_CANDIDATES,
            env: ENV_RANK_CANDIDATES,
        })?;
        Ok(Self {
            sources: Sources {
                request,
                candidates,
            },
            overrides: EngineOverrides {
                kernel_size: args.kernel_size,
                group_blend: args.group_blend,
                compromise_exponent: args.compromise_exponent,
                tie_tolerance: args.tie_tolerance,
            },
            places_key: args.places_key.filter(|key| !key.trim().is_empty()),
        })
    }
}

/// One kernel member as printed by `rank`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct KernelEntry {
    pub(crate) name: String,
    pub(crate) rank: usize,
    pub(crate) utility: f64,
    pub(crate) explanation: String,
    pub(crate) attribution: Attribution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) place: Option<PlaceMetadata>,
}

/// Output of the `rank` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct RankReport {
    pub(crate) kernel: Vec<KernelEntry>,
    pub(crate) summary: Vec<String>,
    pub(crate) deciding_factors: Vec<DecidingFactor>,
    pub(crate) recommendation: Recommendation,
}

/// Builds the optional place metadata provider for a `rank` invocation.
pub(crate) trait PlaceServiceBuilder {
    fn build(
        &self,
        config: &RankConfig,
    ) -> Result<Option<Box<dyn PlaceMetadataService>>, CliError>;
}

pub(crate) struct DefaultPlaceServiceBuilder;

impl PlaceServiceBuilder for DefaultPlaceServiceBuilder {
    fn build(
        &self,
        config: &RankConfig,
    ) -> Result<Option<Box<dyn PlaceMetadataService>>, CliError> {
        let Some(key) = config.places_key.as_deref() else {
            return Ok(None);
        };
        let service = HttpPlaceMetadataService::new(key).map_err(CliError::BuildPlaceProvider)?;
        Ok(Some(Box::new(service)))
    }
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_rank_with(args, &DefaultPlaceServiceBuilder, &mut stdout)
}

pub(crate) fn run_rank_with(
    args: RankArgs,
    builder: &dyn PlaceServiceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.sources.validate()?;
    let report = execute_rank(&config, builder)?;
    write_json(writer, &report)
}

pub(crate) fn execute_rank(
    config: &RankConfig,
    builder: &dyn PlaceServiceBuilder,
) -> Result<RankReport, CliError> {
    let (recommendation, engine) = config.sources.recommend(config.overrides)?;
    let explainer = Explainer::new(&engine)?;
    let places = builder.build(config)?;
    let kernel = recommendation
        .kernel
        .iter()
        .map(|member| {
            let attribution = explainer.attribute(&member.candidate);
            let place = places.as_deref().map(|service| {
                service.lookup_or_empty(&PlaceQuery::new(
                    member.name(),
                    member.candidate.municipality.as_str(),
                ))
            });
            KernelEntry {
                name: member.name().to_owned(),
                rank: member.rank,
                utility: attribution.utility,
                explanation: attribution.to_string(),
                attribution,
                place,
            }
        })
        .collect();
    let deciding_factors = explainer.summary(&recommendation);
    let summary = deciding_factors.iter().map(ToString::to_string).collect();
    Ok(RankReport {
        kernel,
        summary,
        deciding_factors,
        recommendation,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RankConfig, CliError> {
    let merged = RankArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RankConfig::try_from(merged)
}
