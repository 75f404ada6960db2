//! Game-info feed client
//!
//! Pulls the team schedule from a third-party sports-data API. The feed is a
//! stub: when no URL is configured every fetch fails with `NotConfigured`, and
//! callers are expected to show a placeholder instead.

use crate::config::GamesConfig;
use crate::error::DashboardError;
use crate::types::GameInfo;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Shown wherever the game section cannot be filled
pub const PLACEHOLDER: &str = "Schedule unavailable (game feed coming soon)";

#[derive(Error, Debug)]
pub enum GamesError {
    #[error("no game feed configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("feed returned HTTP {0}")]
    Status(u16),
}

impl From<GamesError> for DashboardError {
    fn from(err: GamesError) -> Self {
        DashboardError::ExternalApi(err.to_string())
    }
}

/// Games split for display
#[derive(Debug, Clone, Serialize)]
pub struct GameSection {
    pub team: String,
    pub upcoming: Vec<GameInfo>,
    pub recent: Vec<GameInfo>,
    /// Set instead of the game lists when the feed failed
    pub placeholder: Option<String>,
}

impl GameSection {
    pub fn placeholder(team: &str) -> Self {
        Self {
            team: team.to_string(),
            upcoming: Vec::new(),
            recent: Vec::new(),
            placeholder: Some(PLACEHOLDER.to_string()),
        }
    }
}

/// Client for the sports-data API
pub struct GameFeed {
    client: Client,
    config: GamesConfig,
}

impl GameFeed {
    pub fn new(config: GamesConfig) -> Result<Self, GamesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn team(&self) -> &str {
        &self.config.team
    }

    /// Fetch the configured team's games
    pub async fn fetch_games(&self) -> Result<Vec<GameInfo>, GamesError> {
        let base = self.config.api_url.as_deref().ok_or(GamesError::NotConfigured)?;
        let url = format!("{}/games", base.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(&[("team", self.config.team.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GamesError::Status(response.status().as_u16()));
        }

        let games: Vec<GameInfo> = response.json().await?;
        debug!("Fetched {} games for {}", games.len(), self.config.team);
        Ok(games)
    }

    /// Fetch and split games, falling back to the placeholder on any failure
    pub async fn section(&self) -> GameSection {
        match self.fetch_games().await {
            Ok(games) => {
                let (upcoming, recent) = split_games(games, Utc::now());
                GameSection {
                    team: self.config.team.clone(),
                    upcoming,
                    recent,
                    placeholder: None,
                }
            }
            Err(GamesError::NotConfigured) => GameSection::placeholder(&self.config.team),
            Err(e) => {
                warn!("Game feed unavailable: {}", e);
                GameSection::placeholder(&self.config.team)
            }
        }
    }
}

/// Split into (upcoming soonest-first, recent latest-first)
pub fn split_games(games: Vec<GameInfo>, now: DateTime<Utc>) -> (Vec<GameInfo>, Vec<GameInfo>) {
    let (mut upcoming, mut recent): (Vec<_>, Vec<_>) = games
        .into_iter()
        .partition(|g| !g.is_final() && g.start_time > now);

    upcoming.sort_by_key(|g| g.start_time);
    recent.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    (upcoming, recent)
}
