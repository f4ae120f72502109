use serde::{Deserialize, Deserializer};

use crate::app::errors::{Result, SearchError};

/// One search hit, as much of it as the container needs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieSummary {
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<MovieSummary>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Maps a search response body to records, in the order the API returned them.
///
/// Malformed JSON and JSON of the wrong shape are reported separately so the
/// log says which of the two happened.
pub fn parse_search_response(body: &str) -> Result<Vec<MovieSummary>> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(SearchError::MalformedBody)?;

    let response: SearchResponse = serde_json::from_value(value)
        .map_err(|e| SearchError::InvalidResponseShape(e.to_string()))?;

    Ok(response.results)
}
