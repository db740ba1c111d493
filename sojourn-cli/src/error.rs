//! Error types emitted by the Sojourn CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>` and the workspace denies `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use sojourn_core::{ConfigurationError, RankingError};
use sojourn_data::{ProviderBuildError, TableError};
use thiserror::Error;

/// Errors emitted by the Sojourn CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable consulted.
        env: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// Path that was not found.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Reading the request file failed.
    #[error("failed to read request at {path:?}: {source}")]
    ReadRequest {
        /// Request location.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Request JSON could not be decoded.
    #[error("failed to parse request JSON at {path:?}: {source}")]
    ParseRequest {
        /// Request location.
        path: Utf8PathBuf,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
    /// The candidate table could not be loaded.
    #[error(transparent)]
    LoadCandidates(#[from] TableError),
    /// Engine parameters were rejected.
    #[error("invalid engine configuration: {0}")]
    InvalidConfiguration(#[from] ConfigurationError),
    /// The engine failed to rank the table.
    #[error("ranking failed: {0}")]
    Rank(#[from] RankingError),
    /// A compared candidate is not part of the kernel.
    #[error("'{name}' is not in the recommended kernel")]
    NotInKernel {
        /// Requested candidate name.
        name: String,
    },
    /// Constructing the place metadata provider failed.
    #[error("failed to build place metadata provider: {0}")]
    BuildPlaceProvider(#[source] ProviderBuildError),
    /// Serialising the report failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the report failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
