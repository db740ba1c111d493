//! Data access around the Sojourn engine.
//!
//! Responsibilities:
//! - Load candidate tables from JSON.
//! - Drive an [`EnrichmentService`](sojourn_core::EnrichmentService) over
//!   incomplete rows.
//! - Persist per-locality snapshots of the enriched table.
//! - Look up place metadata over HTTP.
//! - Read files through capability-scoped directory handles.
//!
//! Boundaries:
//! - No ranking rules; those live in `sojourn-scorer` and `sojourn-outrank`.
//! - Collaborator failures degrade results, they never abort a batch.

#![forbid(unsafe_code)]

mod enrich;
mod fs;
mod places;
mod table;

pub use enrich::{EnrichmentReport, enrich_records};
pub use fs::{file_is_file, read_utf8_file};
pub use places::{
    DEFAULT_MEDIA_BASE, DEFAULT_SEARCH_ENDPOINT, DEFAULT_USER_AGENT, HttpPlaceMetadataConfig,
    HttpPlaceMetadataService, PHOTO_MAX_PX, ProviderBuildError,
};
pub use table::{
    ALL_SNAPSHOT, SnapshotError, TableError, UNKNOWN_LOCALITY, load_candidate_table,
    snapshot_file_name, write_locality_snapshots,
};
