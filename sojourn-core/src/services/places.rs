#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::PlaceMetadataError;

/// Lookup key for place metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlaceQuery {
    /// Place name.
    pub name: String,
    /// Locality or municipality used to disambiguate the name.
    pub locality: String,
}

impl PlaceQuery {
    /// Construct a query.
    pub fn new(name: impl Into<String>, locality: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locality: locality.into(),
        }
    }

    /// Stable cache key, `name|locality`.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("{}|{}", self.name, self.locality)
    }
}

/// Presentation details for a place. Every field may be absent.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlaceMetadata {
    /// Formatted street address.
    pub address: Option<String>,
    /// Average rating.
    pub rating: Option<f64>,
    /// Number of reviews behind the rating.
    pub review_count: Option<u32>,
    /// Link to the place on an external map.
    pub map_url: Option<String>,
    /// Photo reference or URL.
    pub photo_url: Option<String>,
}

impl PlaceMetadata {
    /// Whether nothing is known about the place.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.address.is_none()
            && self.rating.is_none()
            && self.review_count.is_none()
            && self.map_url.is_none()
            && self.photo_url.is_none()
    }
}

/// Look up presentation metadata for a place.
///
/// Metadata never influences ranking. Callers that only render results
/// should use [`PlaceMetadataService::lookup_or_empty`], which logs the
/// failure and degrades to an empty record.
pub trait PlaceMetadataService: Send + Sync {
    /// Return metadata for `query`.
    ///
    /// # Errors
    /// Returns [`PlaceMetadataError`] when the lookup fails.
    fn lookup(&self, query: &PlaceQuery) -> Result<PlaceMetadata, PlaceMetadataError>;

    /// Return metadata for `query`, or an empty record on failure.
    fn lookup_or_empty(&self, query: &PlaceQuery) -> PlaceMetadata {
        self.lookup(query).unwrap_or_else(|err| {
            log::warn!("{err}; rendering without place metadata");
            PlaceMetadata::default()
        })
    }
}
