//! Runtime configuration.
//!
//! Defaults point at the public TMDB endpoints with a placeholder key.
//! Environment variables override the defaults and command line flags
//! override both (see `main.rs`).

use std::path::PathBuf;
use std::time::Duration;

pub const PLACEHOLDER_API_KEY: &str = "API_KEY";
pub const DEFAULT_SEARCH_URL: &str = "https://api.themoviedb.org/3/search/movie";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const API_KEY_VAR: &str = "TMDB_API_KEY";
pub const SEARCH_URL_VAR: &str = "TMDB_SEARCH_URL";
pub const IMAGE_BASE_URL_VAR: &str = "TMDB_IMAGE_BASE_URL";
pub const LOG_DIR_VAR: &str = "MOVIE_FINDER_LOG_DIR";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub search_url: String,
    pub image_base_url: String,
    pub request_timeout: Duration,
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: PLACEHOLDER_API_KEY.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            log_dir: default_log_dir(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Blank values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(api_key) = get(API_KEY_VAR) {
            config.api_key = api_key;
        }
        if let Some(search_url) = get(SEARCH_URL_VAR) {
            config.search_url = search_url;
        }
        if let Some(image_base_url) = get(IMAGE_BASE_URL_VAR) {
            config.image_base_url = image_base_url;
        }
        if let Some(log_dir) = get(LOG_DIR_VAR) {
            config.log_dir = PathBuf::from(log_dir);
        }
        config
    }

    pub fn has_placeholder_key(&self) -> bool {
        self.api_key == PLACEHOLDER_API_KEY
    }
}

fn default_log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("movie_finder")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.api_key, PLACEHOLDER_API_KEY);
        assert_eq!(config.search_url, DEFAULT_SEARCH_URL);
        assert_eq!(config.image_base_url, DEFAULT_IMAGE_BASE_URL);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert!(config.log_dir.ends_with("movie_finder"));
        assert!(config.has_placeholder_key());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (API_KEY_VAR, "abc123"),
            (SEARCH_URL_VAR, "http://localhost:9000/search"),
            (IMAGE_BASE_URL_VAR, "http://localhost:9000/img"),
            (LOG_DIR_VAR, "/tmp/mf-logs"),
        ]));
        assert_eq!(config.api_key, "abc123");
        assert_eq!(config.search_url, "http://localhost:9000/search");
        assert_eq!(config.image_base_url, "http://localhost:9000/img");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/mf-logs"));
        assert!(!config.has_placeholder_key());
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = Config::from_lookup(lookup_from(&[(API_KEY_VAR, "   ")]));
        assert!(config.has_placeholder_key());
    }
}
