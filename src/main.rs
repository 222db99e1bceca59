use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use movie_recommender::{
    api::{create_router, AppState},
    config::Config,
    services::{CatalogIndex, TmdbClient},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_recommender=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Missing or corrupt model files are fatal: nothing is served without them
    let catalog = CatalogIndex::load(&config.catalog_path, &config.similarity_path).map_err(|e| {
        tracing::error!(error = %e, "Data files could not be loaded");
        e
    })?;

    let tmdb = TmdbClient::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_language.clone(),
        config.poster_timeout(),
        config.retry_policy()?,
    )?;

    let state = AppState::new(catalog, Arc::new(tmdb))?;
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(address = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
