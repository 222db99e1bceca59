use std::cmp::Ordering;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::Recommendations,
    services::{catalog::CatalogIndex, poster::PosterResolver},
};

/// Number of movies returned per recommendation
pub const RECOMMENDATION_COUNT: usize = 5;

/// Recommends the most similar catalog movies to a given title
///
/// Ranking reads the precomputed similarity row of the query movie; posters
/// are resolved one by one after the ranking is fixed.
#[derive(Clone)]
pub struct RecommendationService {
    catalog: Arc<CatalogIndex>,
    posters: PosterResolver,
}

impl RecommendationService {
    /// Fails if the catalog is too small to always produce a full result
    pub fn new(catalog: Arc<CatalogIndex>, posters: PosterResolver) -> AppResult<Self> {
        if catalog.len() <= RECOMMENDATION_COUNT {
            return Err(AppError::Load(format!(
                "Catalog has {} movies; at least {} are required",
                catalog.len(),
                RECOMMENDATION_COUNT + 1
            )));
        }

        Ok(Self { catalog, posters })
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub fn posters(&self) -> &PosterResolver {
        &self.posters
    }

    /// Top recommendations for `title`.
    ///
    /// Never returns an error: on failure the result is empty and carries a
    /// user-visible message. Poster failures only add warnings.
    pub async fn recommend(&self, title: &str) -> Recommendations {
        match self.try_recommend(title).await {
            Ok(recommendations) => {
                tracing::info!(
                    title = %title,
                    results = recommendations.len(),
                    poster_warnings = recommendations.warnings.len(),
                    "Recommendations generated"
                );
                recommendations
            }
            Err(e) => {
                tracing::error!(title = %title, error = %e, "Recommendation failed");
                Recommendations::failed(format!("Error in recommendation: {}", e))
            }
        }
    }

    async fn try_recommend(&self, title: &str) -> AppResult<Recommendations> {
        let row = self.catalog.title_to_row(title)?;
        let scores = self.catalog.similarity_row(row)?;

        let mut selected = Vec::with_capacity(RECOMMENDATION_COUNT);
        for candidate in rank_neighbors(scores, RECOMMENDATION_COUNT) {
            selected.push((
                self.catalog.row_to_title(candidate)?.to_string(),
                self.catalog.row_to_movie_id(candidate)?,
            ));
        }

        let mut recommendations = Recommendations::default();
        for (name, movie_id) in selected {
            let poster = self.posters.fetch(movie_id).await;
            if let Some(warning) = poster.warning {
                recommendations.warnings.push(warning);
            }
            recommendations.names.push(name);
            recommendations.poster_urls.push(poster.url);
        }

        Ok(recommendations)
    }
}

/// Rows at sorted positions `1..=k` of `scores` ranked by descending score.
///
/// Ties keep row order. Position 0 is dropped unconditionally: it is the query
/// movie itself when self-similarity is maximal, but whichever row ranks first
/// is skipped either way.
pub fn rank_neighbors(scores: &[f64], k: usize) -> Vec<usize> {
    let mut ranked: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
    // Scores are finite; `-0.0` and `0.0` tie
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    ranked.into_iter().skip(1).take(k).map(|(row, _)| row).collect()
}
