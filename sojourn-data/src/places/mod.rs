//! HTTP-backed [`PlaceMetadataService`] using a Places text-search API.
//!
//! Each lookup issues one `places:searchText` request for
//! `"{name} {locality}"`, keeps the first match, and converts it into
//! [`PlaceMetadata`] with a bounded photo media URL. Outcomes, failures
//! included, are cached per `name|locality` for the provider's lifetime.
//!
//! The [`PlaceMetadataService`] trait is synchronous; the provider blocks on
//! an owned Tokio runtime, or on the caller's multi-threaded runtime when
//! one is active.
//!
//! # Example
//!
//! ```no_run
//! use sojourn_core::{PlaceMetadataService, PlaceQuery};
//! use sojourn_data::{HttpPlaceMetadataConfig, HttpPlaceMetadataService};
//!
//! let provider = HttpPlaceMetadataService::with_config(
//!     HttpPlaceMetadataConfig::new(std::env::var("SOJOURN_PLACES_KEY")?),
//! )?;
//! let metadata = provider.lookup_or_empty(&PlaceQuery::new("Catedral", "Girona"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod response;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use sojourn_core::{PlaceMetadata, PlaceMetadataError, PlaceMetadataService, PlaceQuery};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use self::response::{PlaceRecord, TextSearchResponse};

/// Default text-search endpoint.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://places.googleapis.com/v1/places:searchText";

/// Default base for photo media URLs.
pub const DEFAULT_MEDIA_BASE: &str = "https://places.googleapis.com/v1";

/// Default user agent for place lookups.
pub const DEFAULT_USER_AGENT: &str = "sojourn-places/0.1";

/// Longest photo edge requested, in pixels.
pub const PHOTO_MAX_PX: u32 = 400;

const DEFAULT_TIMEOUT_SECS: u64 = 6;

const FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,\
places.location,places.googleMapsUri,places.rating,places.userRatingCount,places.photos";

/// Error type for [`HttpPlaceMetadataService`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// No API key was configured.
    #[error("a places API key is required")]
    MissingApiKey,
    /// A configured URL did not parse.
    #[error("invalid {what} URL '{url}': {source}")]
    InvalidUrl {
        /// Which URL was rejected.
        what: &'static str,
        /// The rejected value.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Configuration for [`HttpPlaceMetadataService`].
#[derive(Clone)]
pub struct HttpPlaceMetadataConfig {
    /// API key sent with every request and embedded in photo URLs.
    pub api_key: String,
    /// Text-search endpoint.
    pub endpoint: String,
    /// Base URL that photo resource names are appended to.
    pub media_base: String,
    /// Language requested for addresses.
    pub language: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl fmt::Debug for HttpPlaceMetadataConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpPlaceMetadataConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("media_base", &self.media_base)
            .field("language", &self.language)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl HttpPlaceMetadataConfig {
    /// Configuration with default endpoints and the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_owned(),
            media_base: DEFAULT_MEDIA_BASE.to_owned(),
            language: "en".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Set the text-search endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the photo media base URL.
    #[must_use]
    pub fn with_media_base(mut self, media_base: impl Into<String>) -> Self {
        self.media_base = media_base.into();
        self
    }

    /// Set the response language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody<'a> {
    text_query: String,
    max_result_count: u8,
    language_code: &'a str,
}

type CachedLookup = Result<PlaceMetadata, PlaceMetadataError>;

/// Place metadata provider backed by a Places text-search endpoint.
pub struct HttpPlaceMetadataService {
    client: Client,
    config: HttpPlaceMetadataConfig,
    endpoint: Url,
    runtime: Runtime,
    cache: Mutex<HashMap<String, CachedLookup>>,
}

impl fmt::Debug for HttpPlaceMetadataService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpPlaceMetadataService")
            .field("config", &self.config)
            .field("endpoint", &self.endpoint.as_str())
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl HttpPlaceMetadataService {
    /// Create a provider with default endpoints.
    ///
    /// # Errors
    /// Returns [`ProviderBuildError`] when the key is empty or the HTTP
    /// client or runtime fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpPlaceMetadataConfig::new(api_key))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    /// Returns [`ProviderBuildError`] when the key is empty, a URL is
    /// invalid, or the HTTP client or runtime fails to build.
    pub fn with_config(config: HttpPlaceMetadataConfig) -> Result<Self, ProviderBuildError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderBuildError::MissingApiKey);
        }
        let endpoint = parse_url("search endpoint", &config.endpoint)?;
        parse_url("media base", &config.media_base)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            endpoint,
            runtime,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Number of cached lookups.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn search_body<'a>(&'a self, query: &PlaceQuery) -> SearchBody<'a> {
        SearchBody {
            text_query: format!("{} {}", query.name, query.locality)
                .trim()
                .to_owned(),
            max_result_count: 1,
            language_code: &self.config.language,
        }
    }

    async fn search(&self, query: &PlaceQuery) -> Result<PlaceMetadata, PlaceMetadataError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("X-Goog-Api-Key", &self.config.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&self.search_body(query))
            .send()
            .await
            .map_err(|err| PlaceMetadataError::Transport {
                name: query.name.clone(),
                message: err.without_url().to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlaceMetadataError::Status {
                name: query.name.clone(),
                status: status.as_u16(),
            });
        }
        let body: TextSearchResponse =
            response
                .json()
                .await
                .map_err(|err| PlaceMetadataError::Decode {
                    name: query.name.clone(),
                    message: err.without_url().to_string(),
                })?;
        Ok(self.convert(body))
    }

    fn convert(&self, body: TextSearchResponse) -> PlaceMetadata {
        let Some(place) = body.into_first() else {
            return PlaceMetadata::default();
        };
        let photo_url = place
            .first_photo()
            .and_then(|photo| self.photo_url(photo));
        let PlaceRecord {
            formatted_address,
            google_maps_uri,
            rating,
            user_rating_count,
            ..
        } = place;
        PlaceMetadata {
            address: formatted_address,
            rating,
            review_count: user_rating_count,
            map_url: google_maps_uri,
            photo_url,
        }
    }

    /// Media URL for a photo resource name, bounded to [`PHOTO_MAX_PX`].
    fn photo_url(&self, photo_name: &str) -> Option<String> {
        let base = self.config.media_base.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/{photo_name}/media")).ok()?;
        let edge = PHOTO_MAX_PX.to_string();
        url.query_pairs_mut()
            .append_pair("maxHeightPx", &edge)
            .append_pair("maxWidthPx", &edge)
            .append_pair("key", &self.config.api_key);
        Some(url.into())
    }
}

impl PlaceMetadataService for HttpPlaceMetadataService {
    /// Look a place up, answering repeated queries from the cache.
    ///
    /// # Runtime requirements
    ///
    /// On a multi-threaded Tokio runtime the request runs on the caller's
    /// runtime. Elsewhere it runs on the provider's own runtime; from a
    /// `current_thread` runtime that happens on a scoped helper thread, so
    /// the caller's runtime is blocked until the lookup returns.
    fn lookup(&self, query: &PlaceQuery) -> Result<PlaceMetadata, PlaceMetadataError> {
        let key = query.cache_key();
        if let Some(hit) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return hit.clone();
        }

        let future = self.search(query);
        let outcome = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            Ok(_) => std::thread::scope(|scope| {
                scope
                    .spawn(|| self.runtime.block_on(future))
                    .join()
                    .unwrap_or_else(|_| {
                        Err(PlaceMetadataError::Transport {
                            name: query.name.clone(),
                            message: "lookup thread panicked".to_owned(),
                        })
                    })
            }),
            Err(_) => self.runtime.block_on(future),
        };
        match &outcome {
            Ok(metadata) if metadata.is_empty() => log::debug!("no place matched '{key}'"),
            Ok(_) => log::debug!("resolved place metadata for '{key}'"),
            Err(err) => log::warn!("{err}"),
        }
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, outcome.clone());
        outcome
    }
}

fn parse_url(what: &'static str, url: &str) -> Result<Url, ProviderBuildError> {
    Url::parse(url).map_err(|source| ProviderBuildError::InvalidUrl {
        what,
        url: url.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn provider() -> HttpPlaceMetadataService {
        HttpPlaceMetadataService::with_config(
            HttpPlaceMetadataConfig::new("test-key").with_media_base("https://media.example/v1/"),
        )
        .expect("provider should build")
    }

    fn parse(json: &str) -> TextSearchResponse {
        serde_json::from_str(json).expect("valid body")
    }

    #[rstest]
    fn empty_key_is_rejected() {
        let err = HttpPlaceMetadataService::new("  ").expect_err("key required");
        assert!(matches!(err, ProviderBuildError::MissingApiKey));
    }

    #[rstest]
    fn invalid_endpoint_is_rejected() {
        let config = HttpPlaceMetadataConfig::new("k").with_endpoint("not a url");
        let err = HttpPlaceMetadataService::with_config(config).expect_err("bad url");
        assert!(matches!(
            err,
            ProviderBuildError::InvalidUrl {
                what: "search endpoint",
                ..
            }
        ));
    }

    #[rstest]
    fn debug_output_redacts_the_key(provider: HttpPlaceMetadataService) {
        let rendered = format!("{provider:?}");
        assert!(!rendered.contains("test-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[rstest]
    fn search_body_joins_name_and_locality(provider: HttpPlaceMetadataService) {
        let body = provider.search_body(&PlaceQuery::new("Sant Pere de Rodes", "El Port de la Selva"));
        let json = serde_json::to_value(&body).expect("serialisable");
        assert_eq!(
            json,
            serde_json::json!({
                "textQuery": "Sant Pere de Rodes El Port de la Selva",
                "maxResultCount": 1,
                "languageCode": "en"
            })
        );
    }

    #[rstest]
    fn converts_first_place(provider: HttpPlaceMetadataService) {
        let body = parse(
            r#"{"places": [{
                "id": "p1",
                "formattedAddress": "Carrer de la Força, Girona",
                "googleMapsUri": "https://maps.example/p1",
                "rating": 4.5,
                "userRatingCount": 87,
                "photos": [{"name": "places/p1/photos/a"}]
            }, {"id": "p2"}]}"#,
        );
        let metadata = provider.convert(body);
        assert_eq!(metadata.address.as_deref(), Some("Carrer de la Força, Girona"));
        assert_eq!(metadata.rating, Some(4.5));
        assert_eq!(metadata.review_count, Some(87));
        assert_eq!(metadata.map_url.as_deref(), Some("https://maps.example/p1"));
        assert_eq!(
            metadata.photo_url.as_deref(),
            Some(
                "https://media.example/v1/places/p1/photos/a/media?maxHeightPx=400&maxWidthPx=400&key=test-key"
            )
        );
    }

    #[rstest]
    fn no_match_is_empty_metadata(provider: HttpPlaceMetadataService) {
        assert!(provider.convert(parse("{}")).is_empty());
    }

    #[rstest]
    fn starts_with_an_empty_cache(provider: HttpPlaceMetadataService) {
        assert_eq!(provider.cached(), 0);
    }

    #[rstest]
    fn lookups_inside_a_current_thread_runtime_do_not_panic() {
        let provider = HttpPlaceMetadataService::with_config(
            HttpPlaceMetadataConfig::new("test-key")
                .with_endpoint("http://127.0.0.1:9/v1/places:searchText")
                .with_timeout(Duration::from_millis(500)),
        )
        .expect("provider should build");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime should build");
        let query = PlaceQuery::new("Catedral", "Girona");
        let outcome = runtime.block_on(async { provider.lookup(&query) });
        assert!(matches!(outcome, Err(PlaceMetadataError::Transport { .. })));
        assert_eq!(provider.cached(), 1);
    }

}
