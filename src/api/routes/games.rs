//! Game-info endpoint

use crate::api::server::AppState;
use crate::games::GameSection;
use axum::{extract::State, Json};

/// Upcoming and recent games, or the placeholder when the feed is down
pub async fn get_games(State(state): State<AppState>) -> Json<GameSection> {
    Json(state.games.section().await)
}
