//! Dashboard view: summary, per-user breakdown, bankroll chart, game section, history

use crate::bets::sort_newest_first;
use crate::api::server::AppState;
use crate::error::DashboardError;
use crate::games::GameSection;
use crate::stats::{self, BankrollPoint, Summary, UnitShare};
use crate::types::Bet;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary with the display strings the page shows
#[derive(Debug, Serialize)]
pub struct SummaryView {
    #[serde(flatten)]
    pub stats: Summary,
    pub record: String,
    pub win_rate_display: String,
    pub roi_display: String,
}

impl From<Summary> for SummaryView {
    fn from(stats: Summary) -> Self {
        Self {
            record: stats.record(),
            win_rate_display: stats.win_rate_display(),
            roi_display: stats.roi_display(),
            stats,
        }
    }
}

/// Row of the per-user table
#[derive(Debug, Serialize)]
pub struct UserRow {
    pub user: String,
    #[serde(flatten)]
    pub summary: SummaryView,
}

/// Everything the dashboard page renders
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub summary: SummaryView,
    pub users: Vec<UserRow>,
    pub unit_shares: Vec<UnitShare>,
    pub bankroll: Vec<BankrollPoint>,
    pub bankroll_by_user: BTreeMap<String, Vec<BankrollPoint>>,
    pub games: GameSection,
    pub bets: Vec<Bet>,
}

/// Stats response
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub summary: SummaryView,
    pub users: Vec<UserRow>,
}

/// Query parameters for the bankroll series
#[derive(Debug, Deserialize)]
pub struct BankrollQuery {
    pub user: Option<String>,
}

/// Bankroll response
#[derive(Debug, Serialize)]
pub struct BankrollResponse {
    pub user: Option<String>,
    pub points: Vec<BankrollPoint>,
}

fn user_rows(bets: &[Bet]) -> Vec<UserRow> {
    stats::per_user(bets)
        .into_iter()
        .map(|(user, summary)| UserRow {
            user,
            summary: summary.into(),
        })
        .collect()
}

/// Build the full view from a loaded bet set and a game section
pub fn build_dashboard(
    mut bets: Vec<Bet>,
    syndicate: &[(String, rust_decimal::Decimal)],
    games: GameSection,
) -> DashboardResponse {
    let summary = stats::summarize(&bets);
    let unit_shares = stats::unit_shares(summary.total_profit, syndicate);
    let users = user_rows(&bets);
    let bankroll = stats::bankroll_series(&bets, None);
    let bankroll_by_user = stats::bankroll_by_user(&bets);
    sort_newest_first(&mut bets);

    DashboardResponse {
        summary: summary.into(),
        users,
        unit_shares,
        bankroll,
        bankroll_by_user,
        games,
        bets,
    }
}

/// Full dashboard. A failing game feed only blanks the game section.
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, DashboardError> {
    let bets = state.db.load_bets().await?;
    let games = state.games.section().await;

    Ok(Json(build_dashboard(bets, &state.config.syndicate, games)))
}

/// Aggregate and per-user stats
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, DashboardError> {
    let bets = state.db.load_bets().await?;

    Ok(Json(StatsResponse {
        summary: stats::summarize(&bets).into(),
        users: user_rows(&bets),
    }))
}

/// Bankroll series, aggregate or for one user
pub async fn get_bankroll(
    State(state): State<AppState>,
    Query(query): Query<BankrollQuery>,
) -> Result<Json<BankrollResponse>, DashboardError> {
    let bets = state.db.load_bets().await?;
    let points = stats::bankroll_series(&bets, query.user.as_deref());

    Ok(Json(BankrollResponse {
        user: query.user,
        points,
    }))
}
