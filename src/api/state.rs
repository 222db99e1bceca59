use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::AppResult;
use crate::services::{CatalogIndex, PosterResolver, PosterSource, RecommendationService};

/// Shared application state. Everything in it is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub recommender: RecommendationService,
    pub loaded_at: DateTime<Utc>,
}

impl AppState {
    /// Wires the catalog and a poster source into the recommendation service
    pub fn new(catalog: CatalogIndex, poster_source: Arc<dyn PosterSource>) -> AppResult<Self> {
        let posters = PosterResolver::new(poster_source);
        let recommender = RecommendationService::new(Arc::new(catalog), posters)?;

        Ok(Self {
            recommender,
            loaded_at: Utc::now(),
        })
    }
}
