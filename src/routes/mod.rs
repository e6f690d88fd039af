use std::sync::Arc;

use axum::{extract::State, http::StatusCode, middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{MovieInfoService, Recommender},
};

pub mod movies;
pub mod people;
pub mod recommendations;
pub mod titles;

/// Largest `k` a client may ask for
pub const MAX_RECOMMENDATIONS: usize = 50;

/// Shared, read-only application state
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub movie_info: Arc<MovieInfoService>,
    /// `k` used when the request does not give one
    pub default_count: usize,
}

impl AppState {
    pub fn new(
        recommender: Arc<Recommender>,
        movie_info: Arc<MovieInfoService>,
        default_count: usize,
    ) -> Self {
        Self {
            recommender,
            movie_info,
            default_count,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/titles", get(titles::list))
        .route("/recommendations", get(recommendations::recommend))
        .route("/movies/:id", get(movies::details))
        .route("/movies/:id/reviews", get(movies::reviews))
        .route("/movies/:id/trailer", get(movies::trailer))
        .route("/people/:id", get(people::details))
        .route("/people/:id/credits", get(people::credits))
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "catalog_size": state.recommender.catalog().len(),
        })),
    )
}
