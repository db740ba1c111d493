use thiserror::Error;

/// Errors from [`crate::EnrichmentService::enrich`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrichmentError {
    /// The service could not be reached or refused the request.
    #[error("enrichment service unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
    /// The service answered with something that is not a score mapping.
    #[error("malformed enrichment response: {message}")]
    MalformedResponse {
        /// Description of the failure.
        message: String,
    },
}

/// Errors from [`crate::PlaceMetadataService::lookup`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceMetadataError {
    /// The request could not be sent or timed out.
    #[error("place lookup for '{name}' failed: {message}")]
    Transport {
        /// Place name that was looked up.
        name: String,
        /// Description of the failure.
        message: String,
    },
    /// The service responded with an error status.
    #[error("place lookup for '{name}' returned HTTP {status}")]
    Status {
        /// Place name that was looked up.
        name: String,
        /// HTTP status code.
        status: u16,
    },
    /// The response body could not be decoded.
    #[error("place lookup for '{name}' returned an undecodable body: {message}")]
    Decode {
        /// Place name that was looked up.
        name: String,
        /// Description of the failure.
        message: String,
    },
}
