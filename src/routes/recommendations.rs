use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::{AppState, MAX_RECOMMENDATIONS};
use crate::{
    error::{AppError, AppResult},
    models::RecommendationResponse,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: Option<String>,
    pub k: Option<usize>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    // An empty title is a lookup like any other; only a missing one is rejected
    let title = params.title.ok_or_else(|| {
        AppError::InvalidInput("query parameter `title` is required".to_string())
    })?;
    let k = params.k.unwrap_or(state.default_count).min(MAX_RECOMMENDATIONS);

    let scored = state.recommender.recommend_scored(&title, k)?;
    tracing::info!(title = %title, k, returned = scored.len(), "Recommendations computed");

    let recommendations = state.movie_info.recommendation_cards(scored).await;
    Ok(Json(RecommendationResponse {
        source_title: title,
        recommendations,
    }))
}
