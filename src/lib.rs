//! Bet Tracker Library
//!
//! A small shared dashboard for logging sports bets:
//!
//! 1. **Bet log**: bets are entered behind a shared password and kept in SQLite.
//! 2. **Stats**: totals, win rate, per-user breakdown, unit-share split and a
//!    cumulative bankroll series, recomputed from the full log on every request.
//! 3. **Schedule**: an optional sports-data feed; when it is missing or down the
//!    page shows a placeholder and everything else still renders.

pub mod api;
pub mod bets;
pub mod config;
pub mod db;
pub mod error;
pub mod games;
pub mod stats;
pub mod types;

pub use config::Config;
pub use db::Database;
pub use error::DashboardError;
pub use games::{GameFeed, GameSection};
pub use stats::{BankrollPoint, Summary};
pub use types::{Bet, GameInfo, NewBet, Odds, Outcome};
