use std::sync::Arc;

use crate::{models::Poster, services::providers::PosterSource};

/// Prefix for TMDB poster paths. Paths are appended verbatim, so a path that
/// starts with `/` yields a double slash.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500/";

pub const NO_POSTER_URL: &str = "https://via.placeholder.com/500x750?text=No+Poster+Available";

pub const POSTER_ERROR_URL: &str = "https://via.placeholder.com/500x750?text=Error+Loading+Poster";

/// Turns movie IDs into displayable poster URLs.
///
/// `fetch` never fails: a missing poster or a failed lookup resolves to a
/// placeholder URL, the latter with a warning for the user.
#[derive(Clone)]
pub struct PosterResolver {
    source: Arc<dyn PosterSource>,
}

impl PosterResolver {
    pub fn new(source: Arc<dyn PosterSource>) -> Self {
        Self { source }
    }

    pub async fn fetch(&self, movie_id: i64) -> Poster {
        match self.source.poster_path(movie_id).await {
            Ok(Some(path)) if !path.is_empty() => {
                Poster::found(format!("{}{}", POSTER_BASE_URL, path))
            }
            Ok(_) => Poster::fallback(NO_POSTER_URL, None),
            Err(e) => {
                tracing::warn!(
                    movie_id,
                    provider = self.source.name(),
                    error = %e,
                    "Poster lookup failed"
                );
                Poster::fallback(
                    POSTER_ERROR_URL,
                    Some(format!("Could not fetch poster for movie ID {}: {}", movie_id, e)),
                )
            }
        }
    }
}
