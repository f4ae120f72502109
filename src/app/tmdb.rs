use image::DynamicImage;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::app::errors::{Result, SearchError};
use crate::app::movie::{MovieSummary, parse_search_response};
use crate::config::Config;

/// Where search results and posters come from.
pub trait MovieSource: Send + Sync {
    fn search(&self, term: &str) -> Result<Vec<MovieSummary>>;

    fn poster(&self, url: &str) -> Result<DynamicImage>;
}

/// Blocking client for the TMDB search API
pub struct TmdbClient {
    client: reqwest::blocking::Client,
    search_url: String,
    api_key: String,
}

/// Error body TMDB sends alongside non-success statuses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    status_message: String,
}

impl TmdbClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            search_url: config.search_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

impl MovieSource for TmdbClient {
    fn search(&self, term: &str) -> Result<Vec<MovieSummary>> {
        let url = build_search_url(&self.search_url, &self.api_key, term);
        debug!(term, "Requesting search results");

        // reqwest errors carry the request URL, which includes the key
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| SearchError::Network(e.without_url()))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| SearchError::Network(e.without_url()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.status_message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown").to_string());
            warn!(status = status.as_u16(), %message, "Search request rejected");
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        parse_search_response(&body)
    }

    /// Downloads and decodes a poster image
    fn poster(&self, url: &str) -> Result<DynamicImage> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| SearchError::Poster(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SearchError::Poster(format!(
                "status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| SearchError::Poster(e.to_string()))?;

        image::load_from_memory(&bytes).map_err(|e| SearchError::Poster(e.to_string()))
    }
}

/// Builds the search request URL. Both the key and the term are
/// percent-encoded; the term is otherwise passed through as typed.
pub fn build_search_url(base: &str, api_key: &str, term: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!(
        "{}{}api_key={}&query={}",
        base,
        separator,
        urlencoding::encode(api_key),
        urlencoding::encode(term)
    )
}

/// Full poster URL, or `None` when the record has no usable poster path.
pub fn poster_url(image_base: &str, poster_path: Option<&str>) -> Option<String> {
    let path = poster_path?.trim();
    if path.is_empty() {
        return None;
    }
    Some(format!(
        "{}/{}",
        image_base.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}
