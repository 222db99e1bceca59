use serde::{Deserialize, Serialize};

pub mod movie;

pub use movie::CatalogEntry;

/// A resolved poster image for one movie
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Poster {
    /// Displayable image URL; a placeholder when the real poster is unavailable
    pub url: String,
    /// Non-fatal message for the user when the lookup failed
    pub warning: Option<String>,
}

impl Poster {
    pub fn found(url: String) -> Self {
        Self { url, warning: None }
    }

    pub fn fallback(url: &str, warning: Option<String>) -> Self {
        Self {
            url: url.to_string(),
            warning,
        }
    }
}

/// Result of a recommendation request.
///
/// `names` and `poster_urls` always have the same length: either the full
/// list of recommendations or zero, in which case `error` says why.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Recommendations {
    pub names: Vec<String>,
    #[serde(rename = "posters")]
    pub poster_urls: Vec<String>,
    pub error: Option<String>,
    pub warnings: Vec<String>,
}

impl Recommendations {
    /// Empty result carrying a user-visible error message
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Subset of the TMDB `GET /3/movie/{movie_id}` response
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmdb_details_with_poster_path() {
        let json = r#"{"id": 603, "title": "The Matrix", "poster_path": "/xyz.jpg"}"#;
        let details: TmdbMovieDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.poster_path.as_deref(), Some("/xyz.jpg"));
    }

    #[test]
    fn test_tmdb_details_null_or_missing_poster_path() {
        let details: TmdbMovieDetails = serde_json::from_str(r#"{"poster_path": null}"#).unwrap();
        assert_eq!(details.poster_path, None);

        let details: TmdbMovieDetails = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(details.poster_path, None);
    }

    #[test]
    fn test_recommendations_serialization() {
        let recs = Recommendations::failed("Not found: Heat");
        let value = serde_json::to_value(&recs).unwrap();

        assert_eq!(value["names"], serde_json::json!([]));
        assert_eq!(value["posters"], serde_json::json!([]));
        assert_eq!(value["error"], "Not found: Heat");
        assert!(recs.is_empty());
    }
}
