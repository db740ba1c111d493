//! Inputs shared by the `rank` and `compare` commands.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use sojourn_core::{EngineConfig, RecommendRequest, Recommendation, Recommender, TravelerGroup};
use sojourn_data::{file_is_file, load_candidate_table, read_utf8_file};
use sojourn_outrank::OutrankingRecommender;
use sojourn_scorer::PreferenceScorer;

use crate::CliError;

/// Contents of a request file: who is travelling and how to rank.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct RequestFile {
    /// Travellers, primary profile first.
    pub(crate) travelers: TravelerGroup,
    /// Engine parameters; omitted fields keep their defaults.
    #[serde(default)]
    pub(crate) config: EngineConfig,
}

/// Engine parameters that may be overridden from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct EngineOverrides {
    pub(crate) kernel_size: Option<usize>,
    pub(crate) group_blend: Option<f64>,
    pub(crate) compromise_exponent: Option<f64>,
    pub(crate) tie_tolerance: Option<f64>,
}

impl EngineOverrides {
    /// Overlay the set overrides onto `config` and validate the result.
    pub(crate) fn apply(self, mut config: EngineConfig) -> Result<EngineConfig, CliError> {
        if let Some(kernel_size) = self.kernel_size {
            config = config.with_kernel_size(kernel_size);
        }
        if let Some(blend) = self.group_blend {
            config = config.with_group_blend(blend);
        }
        if let Some(exponent) = self.compromise_exponent {
            config = config.with_compromise_exponent(exponent);
        }
        if let Some(tolerance) = self.tie_tolerance {
            config = config.with_tie_tolerance(tolerance);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Paths every command reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Sources {
    /// Request file.
    pub(crate) request: Utf8PathBuf,
    /// Candidate table.
    pub(crate) candidates: Utf8PathBuf,
}

impl Sources {
    pub(crate) fn validate(&self) -> Result<(), CliError> {
        require_existing(&self.request, crate::ARG_REQUEST)?;
        require_existing(&self.candidates, crate::ARG_CANDIDATES)?;
        Ok(())
    }

    /// Load both inputs, apply `overrides`, and rank the table.
    pub(crate) fn recommend(
        &self,
        overrides: EngineOverrides,
    ) -> Result<(Recommendation, EngineConfig), CliError> {
        let file = load_request(&self.request)?;
        let config = overrides.apply(file.config)?;
        let records = load_candidate_table(&self.candidates)?;
        let request = RecommendRequest::from_records(records, file.travelers, config.clone())?;
        let recommendation =
            OutrankingRecommender::new(PreferenceScorer::default()).recommend(&request)?;
        log::debug!(
            "ranked {} of {} candidates from {}",
            recommendation.diagnostics.admitted,
            recommendation.diagnostics.supplied,
            self.candidates
        );
        Ok((recommendation, config))
    }
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Load a JSON-encoded [`RequestFile`] from disk.
pub(crate) fn load_request(path: &Utf8Path) -> Result<RequestFile, CliError> {
    let contents = read_utf8_file(path).map_err(|source| CliError::ReadRequest {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::ParseRequest {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `payload` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(
    writer: &mut dyn std::io::Write,
    payload: &T,
) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(payload).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(rendered.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
