use axum::{
    extract::{Path, State},
    Json,
};

use super::AppState;
use crate::{
    error::AppResult,
    models::{CreditView, PersonView},
};

pub async fn details(
    State(state): State<AppState>,
    Path(person_id): Path<i64>,
) -> AppResult<Json<PersonView>> {
    let view = state.movie_info.person_view(person_id).await?;
    Ok(Json(view))
}

/// Top "known for" credits, most popular first
pub async fn credits(
    State(state): State<AppState>,
    Path(person_id): Path<i64>,
) -> Json<Vec<CreditView>> {
    Json(state.movie_info.known_for_view(person_id).await)
}
