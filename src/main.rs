use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinematch_api::{
    config::Config,
    db::{create_redis_client, Cache},
    routes::{create_router, AppState},
    services::{
        providers::{
            DisabledTrailers, MovieMetadataProvider, TmdbProvider, TrailerProvider,
            YoutubeProvider,
        },
        sentiment::VaderScorer,
        CatalogStore, MovieInfoService, Recommender, RecommenderOptions, SimilarityIndex,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog = CatalogStore::load(&config.catalog_path)
        .with_context(|| format!("loading catalog from {}", config.catalog_path))?;
    let similarity = SimilarityIndex::load(&config.similarity_path)
        .with_context(|| format!("loading similarity matrix from {}", config.similarity_path))?;
    tracing::info!(
        titles = catalog.len(),
        dimension = similarity.dimension(),
        "Snapshots loaded"
    );

    let recommender = Recommender::new(
        Arc::new(catalog),
        Arc::new(similarity),
        RecommenderOptions {
            exclude_self_by_position: config.exclude_self_by_position,
        },
    )
    .context("catalog and similarity matrix do not match")?;

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .context("building HTTP client")?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_handle) = Cache::new(redis_client);

    let metadata: Arc<dyn MovieMetadataProvider> = Arc::new(TmdbProvider::new(
        http_client.clone(),
        cache.clone(),
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    ));
    let trailers: Arc<dyn TrailerProvider> = match &config.youtube_api_key {
        Some(key) => Arc::new(YoutubeProvider::new(
            http_client,
            cache,
            key.clone(),
            config.youtube_api_url.clone(),
        )),
        None => {
            tracing::warn!("YOUTUBE_API_KEY not set, trailer lookups disabled");
            Arc::new(DisabledTrailers)
        }
    };

    let movie_info = MovieInfoService::new(
        metadata,
        trailers,
        Arc::new(VaderScorer),
        config.tmdb_image_base_url.clone(),
    );

    let state = AppState::new(
        Arc::new(recommender),
        Arc::new(movie_info),
        config.recommendation_count,
    );
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(stats) = cache_handle.shutdown().await {
        tracing::info!(
            written = stats.written,
            failed = stats.failed,
            "Cache writes flushed"
        );
    }
    Ok(())
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await;
}

/// Resolves when `signal` fires; never resolves if the listener could not be installed
async fn wait_for_signal<F>(signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal, serving until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
