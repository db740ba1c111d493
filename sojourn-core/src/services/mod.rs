//! Collaborators outside the ranking core.
//!
//! Criterion enrichment and place metadata lookups are I/O concerns. The core
//! only fixes their contracts here; adapters live in `sojourn-data`. Either
//! collaborator may be slow, cached or retried, and neither may block
//! ranking: enrichment failures leave the neutral prior in place and missing
//! metadata merely degrades rendered output.

mod enrichment;
mod error;
mod places;

pub use enrichment::{CriterionScores, EnrichmentQuery, EnrichmentService};
pub use error::{EnrichmentError, PlaceMetadataError};
pub use places::{PlaceMetadata, PlaceMetadataService, PlaceQuery};
