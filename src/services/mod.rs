pub mod catalog;
pub mod poster;
pub mod providers;
pub mod recommendations;
pub mod retry;

pub use catalog::CatalogIndex;
pub use poster::PosterResolver;
pub use providers::{PosterSource, TmdbClient};
pub use recommendations::RecommendationService;
pub use retry::RetryPolicy;
