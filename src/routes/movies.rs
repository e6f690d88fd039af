use axum::{
    extract::{Path, State},
    Json,
};

use super::AppState;
use crate::{
    error::AppResult,
    models::{MovieView, ReviewsView, TrailerView},
};

pub async fn details(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> AppResult<Json<MovieView>> {
    let view = state.movie_info.movie_view(movie_id).await?;
    Ok(Json(view))
}

pub async fn reviews(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> Json<ReviewsView> {
    Json(state.movie_info.reviews_view(movie_id).await)
}

pub async fn trailer(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> Json<TrailerView> {
    Json(state.movie_info.trailer_view(movie_id).await)
}
