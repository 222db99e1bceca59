use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::Recommendations;

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct PosterResponse {
    pub movie_id: i64,
    pub poster_url: String,
    pub warning: Option<String>,
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "movies": state.recommender.catalog().len(),
        "loaded_at": state.loaded_at.to_rfc3339(),
    }))
}

/// All catalog titles, in catalog order
pub async fn list_movies(State(state): State<AppState>) -> Json<Vec<String>> {
    let titles = state
        .recommender
        .catalog()
        .titles()
        .map(str::to_string)
        .collect();
    Json(titles)
}

/// Recommendations for a title.
///
/// Always answers 200 once the title is non-blank; an unknown title yields
/// empty lists and an `error` message.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<Recommendations>> {
    if query.title.trim().is_empty() {
        return Err(AppError::InvalidInput("title cannot be empty".to_string()));
    }

    tracing::info!(
        request_id = %request_id,
        title = %query.title,
        "Processing recommendation request"
    );

    let recommendations = state.recommender.recommend(&query.title).await;
    Ok(Json(recommendations))
}

/// Poster URL for a single movie
pub async fn movie_poster(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> Json<PosterResponse> {
    let poster = state.recommender.posters().fetch(movie_id).await;

    Json(PosterResponse {
        movie_id,
        poster_url: poster.url,
        warning: poster.warning,
    })
}
