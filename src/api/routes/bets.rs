//! Bet entry and history endpoints

use crate::api::routes::auth::require_session;
use crate::api::server::AppState;
use crate::bets::{parse_outcome, sort_newest_first, CreateBetRequest};
use crate::error::DashboardError;
use crate::types::Bet;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Query parameters for listing bets
#[derive(Debug, Deserialize)]
pub struct ListBetsQuery {
    /// Only bets placed by this user
    pub user: Option<String>,
}

/// Bets response
#[derive(Debug, Serialize)]
pub struct BetsResponse {
    pub bets: Vec<Bet>,
    pub total: usize,
}

/// Outcome update request
#[derive(Debug, Deserialize)]
pub struct UpdateOutcomeRequest {
    pub outcome: String,
}

/// Bet history
pub async fn list_bets(
    State(state): State<AppState>,
    Query(query): Query<ListBetsQuery>,
) -> Result<Json<BetsResponse>, DashboardError> {
    let mut bets = match query.user.as_deref() {
        Some(user) => state.db.load_bets_for_user(user).await?,
        None => state.db.load_bets().await?,
    };
    sort_newest_first(&mut bets);

    let total = bets.len();
    Ok(Json(BetsResponse { bets, total }))
}

/// Record a new bet
pub async fn create_bet(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Json(req): Json<CreateBetRequest>,
) -> Result<(StatusCode, Json<Bet>), DashboardError> {
    require_session(&state, auth).await?;

    let new_bet = req.validate(Utc::now().date_naive())?;
    let bet = state.db.append_bet(&new_bet).await?;
    info!(
        "Bet saved: #{} {} {} on {} at {}",
        bet.id, bet.user, bet.stake, bet.description, bet.odds
    );

    Ok((StatusCode::CREATED, Json(bet)))
}

/// Settle (or reopen) a bet
pub async fn update_outcome(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Path(bet_id): Path<i64>,
    Json(req): Json<UpdateOutcomeRequest>,
) -> Result<Json<Bet>, DashboardError> {
    require_session(&state, auth).await?;

    let outcome = parse_outcome(&req.outcome)?;
    let bet = state.db.update_outcome(bet_id, outcome).await?;
    Ok(Json(bet))
}
