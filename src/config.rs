//! Configuration management for the bet tracker

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

/// Longest session lifetime, one year
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Dashboard configuration loaded from environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared password that unlocks bet entry
    pub password: Option<String>,

    /// Path to SQLite database
    pub database_path: String,

    /// Address the web server binds to
    pub bind_addr: SocketAddr,

    /// Lifetime of a login session in hours
    pub session_ttl_hours: i64,

    /// Game-info feed settings
    pub games: GamesConfig,

    /// Syndicate members and their units, for the unit-share split
    pub syndicate: Vec<(String, Decimal)>,
}

#[derive(Debug, Clone)]
pub struct GamesConfig {
    /// Base URL of the sports-data API (unset = placeholder only)
    pub api_url: Option<String>,
    /// Team whose schedule is shown
    pub team: String,
    /// HTTP timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for GamesConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            team: "Capitals".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            password: None,
            database_path: "bets.db".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            session_ttl_hours: 24,
            games: GamesConfig::default(),
            syndicate: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let password = env::var("DASHBOARD_PASSWORD").ok().filter(|s| !s.is_empty());

        let database_path = env::var("DATABASE_PATH").unwrap_or(defaults.database_path);

        let bind_addr = match env::var("BIND_ADDR") {
            Ok(v) => v
                .parse()
                .with_context(|| format!("BIND_ADDR is not a socket address: {}", v))?,
            Err(_) => defaults.bind_addr,
        };

        let session_ttl_hours = env::var("SESSION_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.session_ttl_hours);

        let games = GamesConfig {
            api_url: env::var("GAMES_API_URL").ok().filter(|s| !s.is_empty()),
            team: env::var("GAMES_TEAM").unwrap_or(defaults.games.team),
            timeout_seconds: env::var("GAMES_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.games.timeout_seconds),
        };

        let syndicate = match env::var("SYNDICATE_UNITS") {
            Ok(v) if !v.trim().is_empty() => parse_syndicate(&v)?,
            _ => Vec::new(),
        };

        check_session_ttl(session_ttl_hours)?;

        Ok(Self {
            password,
            database_path,
            bind_addr,
            session_ttl_hours,
            games,
            syndicate,
        })
    }

    /// The password, required before the server may accept writes
    pub fn require_password(&self) -> Result<&str> {
        self.password
            .as_deref()
            .context("DASHBOARD_PASSWORD must be set to run the dashboard")
    }
}

/// Session lifetime must fall within `1..=MAX_SESSION_TTL_HOURS`
pub fn check_session_ttl(hours: i64) -> Result<()> {
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        anyhow::bail!(
            "SESSION_TTL_HOURS must be between 1 and {}, got {}",
            MAX_SESSION_TTL_HOURS,
            hours
        );
    }
    Ok(())
}

/// Parse `Name:units,Name:units` into member/unit pairs
pub fn parse_syndicate(raw: &str) -> Result<Vec<(String, Decimal)>> {
    let mut members = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, units) = entry
            .split_once(':')
            .with_context(|| format!("SYNDICATE_UNITS entry '{}' is not Name:units", entry))?;
        let units = Decimal::from_str(units.trim())
            .with_context(|| format!("SYNDICATE_UNITS units for '{}' is not a number", name))?;
        if units < Decimal::ZERO {
            anyhow::bail!("SYNDICATE_UNITS units for '{}' must not be negative", name);
        }
        members.push((name.trim().to_string(), units));
    }
    Ok(members)
}
