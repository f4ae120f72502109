//! Error types for movie searches.

use thiserror::Error;

/// Everything that can go wrong between submitting a search and having
/// records ready for the container.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Transport failure, including timeouts.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API request failed with status {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message from the API body, or the canonical status text
        message: String,
    },

    /// The body was not JSON at all.
    #[error("Malformed response body: {0}")]
    MalformedBody(#[source] serde_json::Error),

    /// The body was JSON but not the shape of a search response.
    #[error("Invalid response shape: {0}")]
    InvalidResponseShape(String),

    /// A poster could not be downloaded or decoded.
    #[error("Failed to load poster: {0}")]
    Poster(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
