//! SQLite store for bets and login sessions

use crate::error::DashboardError;
use crate::types::{compute_profit, Bet, NewBet, Odds, Outcome};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Session information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Database connection pool
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database at `path`
    pub async fn new(path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database at {}", path))?;

        let db = Self { pool };
        db.initialize().await.context("Failed to initialize schema")?;

        Ok(db)
    }

    /// Initialize database schema
    async fn initialize(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user TEXT NOT NULL,
                bet_date TEXT NOT NULL,
                description TEXT NOT NULL,
                legs TEXT,
                stake TEXT NOT NULL,
                odds_format TEXT NOT NULL,
                odds TEXT NOT NULL,
                outcome TEXT NOT NULL DEFAULT 'pending',
                profit TEXT NOT NULL DEFAULT '0',
                created_at TEXT NOT NULL,
                settled_at TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_bets_date ON bets(bet_date)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_bets_user ON bets(user)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_expires ON sessions(expires_at)")
            .execute(&self.pool)
            .await?;

        info!("Database initialized");
        Ok(())
    }

    // ==================== BETS ====================

    /// Load every bet in insertion order
    pub async fn load_bets(&self) -> Result<Vec<Bet>, DashboardError> {
        let rows = sqlx::query("SELECT * FROM bets ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_bet).collect()
    }

    /// Load the bets of a single user
    pub async fn load_bets_for_user(&self, user: &str) -> Result<Vec<Bet>, DashboardError> {
        let rows = sqlx::query("SELECT * FROM bets WHERE user = ? ORDER BY id")
            .bind(user)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_bet).collect()
    }

    /// Get bet by id
    pub async fn get_bet(&self, id: i64) -> Result<Option<Bet>, DashboardError> {
        let row = sqlx::query("SELECT * FROM bets WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_bet).transpose()
    }

    /// Append a validated bet and return the stored record
    pub async fn append_bet(&self, bet: &NewBet) -> Result<Bet, DashboardError> {
        let now = Utc::now();
        let profit = bet.profit();
        let settled_at = (bet.outcome != Outcome::Pending).then_some(now);

        let result = sqlx::query(
            r#"
            INSERT INTO bets (user, bet_date, description, legs, stake, odds_format, odds, outcome, profit, created_at, settled_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&bet.user)
        .bind(bet.date.format(DATE_FORMAT).to_string())
        .bind(&bet.description)
        .bind(bet.legs.as_deref())
        .bind(bet.stake.to_string())
        .bind(bet.odds.format_str())
        .bind(bet.odds.value_string())
        .bind(bet.outcome.as_str())
        .bind(profit.to_string())
        .bind(now.to_rfc3339())
        .bind(settled_at.map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Appended bet {} for {}", id, bet.user);

        Ok(Bet {
            id,
            user: bet.user.clone(),
            date: bet.date,
            description: bet.description.clone(),
            legs: bet.legs.clone(),
            stake: bet.stake,
            odds: bet.odds,
            outcome: bet.outcome,
            profit,
            created_at: now,
            settled_at,
        })
    }

    /// Change the outcome of a bet and recompute its profit
    pub async fn update_outcome(&self, id: i64, outcome: Outcome) -> Result<Bet, DashboardError> {
        let mut bet = self
            .get_bet(id)
            .await?
            .ok_or(DashboardError::NotFound(id))?;

        bet.profit = compute_profit(bet.stake, &bet.odds, outcome);
        bet.settled_at = match outcome {
            Outcome::Pending => None,
            _ if bet.outcome == outcome => bet.settled_at,
            _ => Some(Utc::now()),
        };
        bet.outcome = outcome;

        sqlx::query("UPDATE bets SET outcome = ?, profit = ?, settled_at = ? WHERE id = ?")
            .bind(outcome.as_str())
            .bind(bet.profit.to_string())
            .bind(bet.settled_at.map(|t| t.to_rfc3339()))
            .bind(id)
            .execute(&self.pool)
            .await?;

        info!("Bet {} marked {} ({})", id, outcome, bet.profit);
        Ok(bet)
    }

    // ==================== SESSION MANAGEMENT ====================

    /// Create a new session
    pub async fn create_session(&self, ttl_hours: i64) -> Result<Session, DashboardError> {
        let session_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let expires_at = now + Duration::hours(ttl_hours);

        sqlx::query("INSERT INTO sessions (id, created_at, expires_at) VALUES (?, ?, ?)")
            .bind(&session_id)
            .bind(now.to_rfc3339())
            .bind(expires_at.to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(Session {
            id: session_id,
            created_at: now,
            expires_at,
        })
    }

    /// Validate and get session
    pub async fn get_session(&self, session_id: &str) -> Result<Option<Session>, DashboardError> {
        let row = sqlx::query("SELECT * FROM sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let created_at_str: String = r.try_get("created_at")?;
        let expires_at_str: String = r.try_get("expires_at")?;
        let created_at = parse_timestamp(&created_at_str)?;
        let expires_at = parse_timestamp(&expires_at_str)?;

        // Check if session is expired
        if expires_at < Utc::now() {
            self.delete_session(session_id).await?;
            return Ok(None);
        }

        Ok(Some(Session {
            id: r.try_get("id")?,
            created_at,
            expires_at,
        }))
    }

    /// Delete session
    pub async fn delete_session(&self, session_id: &str) -> Result<(), DashboardError> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Clean up expired sessions
    pub async fn cleanup_expired_sessions(&self) -> Result<u64, DashboardError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn corrupt(column: &str, detail: impl std::fmt::Display) -> DashboardError {
    DashboardError::Storage(format!("corrupt {} column: {}", column, detail))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DashboardError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| corrupt("timestamp", e))
}

fn row_to_bet(row: &SqliteRow) -> Result<Bet, DashboardError> {
    let date_str: String = row.try_get("bet_date")?;
    let stake_str: String = row.try_get("stake")?;
    let odds_format: String = row.try_get("odds_format")?;
    let odds_str: String = row.try_get("odds")?;
    let outcome_str: String = row.try_get("outcome")?;
    let profit_str: String = row.try_get("profit")?;
    let created_at_str: String = row.try_get("created_at")?;
    let settled_at: Option<String> = row.try_get("settled_at")?;

    Ok(Bet {
        id: row.try_get("id")?,
        user: row.try_get("user")?,
        date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| corrupt("bet_date", e))?,
        description: row.try_get("description")?,
        legs: row.try_get("legs")?,
        stake: Decimal::from_str(&stake_str).map_err(|e| corrupt("stake", e))?,
        odds: Odds::from_parts(&odds_format, &odds_str).map_err(|e| corrupt("odds", e))?,
        outcome: Outcome::from_str(&outcome_str).map_err(|e| corrupt("outcome", e))?,
        profit: Decimal::from_str(&profit_str).map_err(|e| corrupt("profit", e))?,
        created_at: parse_timestamp(&created_at_str)?,
        settled_at: settled_at.as_deref().map(parse_timestamp).transpose()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    async fn open_temp() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bets.db");
        let db = Database::new(path.to_str().unwrap()).await.unwrap();
        (dir, db)
    }

    fn new_bet(user: &str, day: u32, stake: Decimal, odds: Odds, outcome: Outcome) -> NewBet {
        NewBet {
            user: user.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 10, day).unwrap(),
            description: "Caps vs Rangers".to_string(),
            legs: Some("Caps ML, Ovechkin to score".to_string()),
            stake,
            odds,
            outcome,
        }
    }

    #[tokio::test]
    async fn test_empty_store_loads_nothing() {
        let (_dir, db) = open_temp().await;
        assert!(db.load_bets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_bet_round_trip() {
        let (_dir, db) = open_temp().await;
        let stored = db
            .append_bet(&new_bet("Alex", 4, dec!(10.50), Odds::Decimal(dec!(2.10)), Outcome::Won))
            .await
            .unwrap();

        let loaded = db.load_bets().await.unwrap();
        assert_eq!(loaded, vec![stored.clone()]);
        assert_eq!(loaded[0].stake.to_string(), "10.50");
        assert_eq!(loaded[0].profit, dec!(11.55));
        assert!(loaded[0].settled_at.is_some());
    }

    #[tokio::test]
    async fn test_many_bets_round_trip_after_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bets.db");
        let path = path.to_str().unwrap();

        let mut written = Vec::new();
        {
            let db = Database::new(path).await.unwrap();
            let outcomes = [Outcome::Pending, Outcome::Won, Outcome::Lost, Outcome::Void];
            for i in 0..20u32 {
                let mut bet = new_bet(
                    ["Alex", "Ben", "Chris"][i as usize % 3],
                    1 + i,
                    Decimal::from(i) + dec!(0.25),
                    if i % 2 == 0 { Odds::American(-110 - i as i32) } else { Odds::Decimal(dec!(1.85)) },
                    outcomes[i as usize % 4],
                );
                if i % 5 == 0 {
                    bet.legs = None;
                }
                written.push(db.append_bet(&bet).await.unwrap());
            }
        }

        let db = Database::new(path).await.unwrap();
        assert_eq!(db.load_bets().await.unwrap(), written);

        let ids: std::collections::HashSet<i64> = written.iter().map(|b| b.id).collect();
        assert_eq!(ids.len(), written.len());
    }

    #[tokio::test]
    async fn test_update_outcome_recomputes_profit() {
        let (_dir, db) = open_temp().await;
        let bet = db
            .append_bet(&new_bet("Ben", 2, dec!(20), Odds::American(150), Outcome::Pending))
            .await
            .unwrap();
        assert_eq!(bet.profit, Decimal::ZERO);
        assert!(bet.settled_at.is_none());

        let won = db.update_outcome(bet.id, Outcome::Won).await.unwrap();
        assert_eq!(won.profit, dec!(30));
        assert!(won.settled_at.is_some());
        assert_eq!(db.get_bet(bet.id).await.unwrap().unwrap(), won);

        let reopened = db.update_outcome(bet.id, Outcome::Pending).await.unwrap();
        assert_eq!(reopened.profit, Decimal::ZERO);
        assert!(reopened.settled_at.is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_bet() {
        let (_dir, db) = open_temp().await;
        let err = db.update_outcome(99, Outcome::Won).await.unwrap_err();
        assert!(matches!(err, DashboardError::NotFound(99)));
    }

    #[tokio::test]
    async fn test_load_for_user() {
        let (_dir, db) = open_temp().await;
        db.append_bet(&new_bet("Alex", 1, dec!(5), Odds::American(-110), Outcome::Lost))
            .await
            .unwrap();
        db.append_bet(&new_bet("Ben", 1, dec!(5), Odds::American(-110), Outcome::Lost))
            .await
            .unwrap();

        let alex = db.load_bets_for_user("Alex").await.unwrap();
        assert_eq!(alex.len(), 1);
        assert_eq!(alex[0].user, "Alex");
    }

    #[tokio::test]
    async fn test_sessions() {
        let (_dir, db) = open_temp().await;
        let session = db.create_session(24).await.unwrap();
        let found = db.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(found.id, session.id);

        db.delete_session(&session.id).await.unwrap();
        assert!(db.get_session(&session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected() {
        let (_dir, db) = open_temp().await;
        let session = db.create_session(-1).await.unwrap();
        assert!(db.get_session(&session.id).await.unwrap().is_none());
        assert_eq!(db.cleanup_expired_sessions().await.unwrap(), 0);
    }
}
