//! Text-search response types for the Places API.
//!
//! Only the fields requested through the field mask are modelled; every one
//! is optional because the service omits empty fields.

use serde::Deserialize;

/// Body of a `places:searchText` response.
#[derive(Debug, Default, Deserialize)]
pub struct TextSearchResponse {
    /// Matching places, best first. Absent when nothing matched.
    #[serde(default)]
    pub places: Vec<PlaceRecord>,
}

/// One place as returned by text search.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaceRecord {
    /// Stable place identifier.
    pub id: Option<String>,
    /// Postal address.
    pub formatted_address: Option<String>,
    /// Link to the place on the map service.
    pub google_maps_uri: Option<String>,
    /// Average rating.
    pub rating: Option<f64>,
    /// Number of ratings.
    pub user_rating_count: Option<u32>,
    /// Photo references; the first one is used.
    pub photos: Vec<PhotoRecord>,
}

/// Photo reference of the form `places/{id}/photos/{ref}`.
#[derive(Debug, Default, Deserialize)]
pub struct PhotoRecord {
    /// Resource name of the photo.
    #[serde(default)]
    pub name: String,
}

impl TextSearchResponse {
    /// The best match, if any.
    #[must_use]
    pub fn into_first(self) -> Option<PlaceRecord> {
        self.places.into_iter().next()
    }
}

impl PlaceRecord {
    /// Resource name of the first photo with a non-empty name.
    #[must_use]
    pub fn first_photo(&self) -> Option<&str> {
        self.photos
            .iter()
            .map(|photo| photo.name.as_str())
            .find(|name| !name.is_empty())
    }
}
