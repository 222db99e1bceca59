use serde::Deserialize;
use std::time::Duration;

use crate::services::retry::RetryPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Language requested from TMDB
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// JSON catalog: array of `{"movie_id", "title"}` records
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// JSON similarity matrix: array of rows
    #[serde(default = "default_similarity_path")]
    pub similarity_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Timeout applied to each poster request attempt
    #[serde(default = "default_poster_timeout_secs")]
    pub poster_timeout_secs: u64,

    /// Retries after the first poster request attempt
    #[serde(default = "default_poster_max_retries")]
    pub poster_max_retries: u32,

    #[serde(default = "default_poster_backoff_factor_secs")]
    pub poster_backoff_factor_secs: f64,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_catalog_path() -> String {
    "model/movie_list.json".to_string()
}

fn default_similarity_path() -> String {
    "model/similarity.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_poster_timeout_secs() -> u64 {
    10
}

fn default_poster_max_retries() -> u32 {
    3
}

fn default_poster_backoff_factor_secs() -> f64 {
    1.0
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn poster_timeout(&self) -> Duration {
        Duration::from_secs(self.poster_timeout_secs)
    }

    /// Retry policy for poster requests built from the `POSTER_*` settings
    pub fn retry_policy(&self) -> anyhow::Result<RetryPolicy> {
        let backoff_factor = Duration::try_from_secs_f64(self.poster_backoff_factor_secs)
            .map_err(|e| anyhow::anyhow!("Invalid POSTER_BACKOFF_FACTOR_SECS: {}", e))?;

        Ok(RetryPolicy {
            max_retries: self.poster_max_retries,
            backoff_factor,
            ..RetryPolicy::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let config: Config = envy::from_iter(vars(&[("TMDB_API_KEY", "secret")])).unwrap();

        assert_eq!(config.tmdb_api_key, "secret");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org");
        assert_eq!(config.tmdb_language, "en-US");
        assert_eq!(config.catalog_path, "model/movie_list.json");
        assert_eq!(config.port, 3000);
        assert_eq!(config.poster_timeout(), Duration::from_secs(10));

        let policy = config.retry_policy().unwrap();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.backoff_factor, Duration::from_secs(1));
    }

    #[test]
    fn test_api_key_required() {
        let result = envy::from_iter::<_, Config>(vars(&[("PORT", "8080")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_backoff_rejected() {
        let config: Config = envy::from_iter(vars(&[
            ("TMDB_API_KEY", "secret"),
            ("POSTER_BACKOFF_FACTOR_SECS", "-1"),
        ]))
        .unwrap();

        assert!(config.retry_policy().is_err());
    }
}
