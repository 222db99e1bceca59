/// TMDB metadata provider
///
/// Resolves poster paths through `GET /3/movie/{movie_id}`. One HTTP client
/// (connection pool, per-attempt timeout) is built at startup and reused for
/// every request; retries follow the configured `RetryPolicy`.
use crate::{
    error::{AppError, AppResult},
    models::TmdbMovieDetails,
    services::{providers::PosterSource, retry::RetryPolicy},
};
use reqwest::Client as HttpClient;
use std::time::Duration;

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
    retry_policy: RetryPolicy,
}

impl TmdbClient {
    /// Creates a TMDB client whose requests time out after `timeout` per attempt
    pub fn new(
        api_key: String,
        api_url: String,
        language: String,
        timeout: Duration,
        retry_policy: RetryPolicy,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            retry_policy,
        })
    }

    fn movie_url(&self, movie_id: i64) -> String {
        format!("{}/3/movie/{}", self.api_url, movie_id)
    }

    async fn fetch_details(&self, movie_id: i64) -> AppResult<TmdbMovieDetails> {
        let url = self.movie_url(movie_id);
        let mut retry = 0;

        loop {
            let response = self
                .http_client
                .get(&url)
                .query(&[
                    ("api_key", self.api_key.as_str()),
                    ("language", self.language.as_str()),
                ])
                .send()
                .await
                // The request URL carries the API key
                .map_err(|e| AppError::HttpClient(e.without_url()))?;

            let status = response.status();

            if status.is_success() {
                let body = response
                    .text()
                    .await
                    .map_err(|e| AppError::HttpClient(e.without_url()))?;

                return serde_json::from_str(&body).map_err(|e| {
                    tracing::debug!(movie_id, response = %body, "Unexpected TMDB response body");
                    AppError::Parse(format!("Failed to parse TMDB response: {}", e))
                });
            }

            if !self.retry_policy.is_retryable(status) {
                return Err(AppError::Network(format!(
                    "TMDB API returned status {}",
                    status
                )));
            }

            if retry >= self.retry_policy.max_retries {
                return Err(AppError::Network(format!(
                    "Max retries ({}) exceeded, last status {}",
                    self.retry_policy.max_retries, status
                )));
            }

            retry += 1;
            let delay = self
                .retry_policy
                .delay_for(retry, status, response.headers());

            tracing::warn!(
                movie_id,
                status = status.as_u16(),
                attempt = retry,
                max_retries = self.retry_policy.max_retries,
                delay_ms = delay.as_millis() as u64,
                "Retrying TMDB request"
            );

            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait::async_trait]
impl PosterSource for TmdbClient {
    async fn poster_path(&self, movie_id: i64) -> AppResult<Option<String>> {
        let details = self.fetch_details(movie_id).await?;

        tracing::debug!(
            movie_id,
            has_poster = details.poster_path.is_some(),
            provider = self.name(),
            "Movie details fetched"
        );

        Ok(details.poster_path)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_client(api_url: &str) -> TmdbClient {
        TmdbClient::new(
            "test_key".to_string(),
            api_url.to_string(),
            "en-US".to_string(),
            Duration::from_secs(10),
            RetryPolicy::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_movie_url() {
        let client = create_test_client("https://api.themoviedb.org");
        assert_eq!(client.movie_url(603), "https://api.themoviedb.org/3/movie/603");
    }

    #[test]
    fn test_movie_url_trailing_slash() {
        let client = create_test_client("http://test.local/");
        assert_eq!(client.movie_url(1), "http://test.local/3/movie/1");
    }

    #[tokio::test]
    async fn test_connection_error_is_not_retried() {
        // Nothing listens on port 9 of the loopback interface
        let client = create_test_client("http://127.0.0.1:9");

        let started = std::time::Instant::now();
        let result = client.poster_path(603).await;

        assert!(matches!(result, Err(AppError::HttpClient(_))));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
