use serde::{Deserialize, Serialize};

/// One movie in the catalog. Its row in the similarity matrix is its
/// position in the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    /// TMDB movie identifier
    pub movie_id: i64,
    /// Display title, used as the lookup key
    pub title: String,
}

impl CatalogEntry {
    pub fn new(movie_id: i64, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
        }
    }
}
