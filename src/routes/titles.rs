use axum::{extract::State, Json};

use super::AppState;

/// Every catalog title, in catalog order
pub async fn list(State(state): State<AppState>) -> Json<Vec<String>> {
    let titles = state
        .recommender
        .catalog()
        .all_titles()
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(titles)
}
