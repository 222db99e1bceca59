/// Movie metadata provider abstraction
///
/// The poster pipeline only needs one capability from the metadata API: given
/// a movie ID, return the relative poster path if the provider has one. The
/// production implementation is TMDB; tests substitute fakes.
use crate::error::AppResult;

pub mod tmdb;

pub use tmdb::TmdbClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterSource: Send + Sync {
    /// Fetch the relative poster path for a movie
    ///
    /// `Ok(None)` means the provider knows the movie but has no poster.
    /// Transport, status and parse failures are returned as errors.
    async fn poster_path(&self, movie_id: i64) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
