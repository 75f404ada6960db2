//! Bet entry form and history ordering, shared by the web routes and the CLI

use crate::error::DashboardError;
use crate::types::{check_stake, Bet, NewBet, Odds, Outcome};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// Longest accepted text field
const MAX_TEXT_LEN: usize = 500;

/// New bet form, kept loosely typed so each field can be checked on its own
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBetRequest {
    pub user: Option<String>,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
    pub description: Option<String>,
    pub legs: Option<String>,
    pub stake: Option<String>,
    /// "-110", "+150", or "2.5" with odds_format = "decimal"
    pub odds: Option<String>,
    /// "american" (default) or "decimal"
    pub odds_format: Option<String>,
    /// pending (default), won, lost, void
    pub outcome: Option<String>,
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, DashboardError> {
    let text = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if text.is_empty() {
        return Err(DashboardError::validation(field, "is required"));
    }
    if text.chars().count() > MAX_TEXT_LEN {
        return Err(DashboardError::validation(
            field,
            format!("must be at most {} characters", MAX_TEXT_LEN),
        ));
    }
    Ok(text)
}

pub fn parse_outcome(raw: &str) -> Result<Outcome, DashboardError> {
    Outcome::from_str(raw).map_err(|e| DashboardError::validation("outcome", e))
}

impl CreateBetRequest {
    /// Check every field and produce a bet ready to store
    pub fn validate(self, today: NaiveDate) -> Result<NewBet, DashboardError> {
        let user = required_text(self.user, "user")?;
        let description = required_text(self.description, "description")?;

        let date = match self.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|_| DashboardError::validation("date", "must be a date like 2025-10-14"))?,
            None => today,
        };

        let legs = match self.legs.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()) {
            Some(l) if l.chars().count() > MAX_TEXT_LEN => {
                return Err(DashboardError::validation(
                    "legs",
                    format!("must be at most {} characters", MAX_TEXT_LEN),
                ))
            }
            other => other,
        };

        let stake_raw = required_text(self.stake, "stake")?;
        let stake = Decimal::from_str(stake_raw.trim_start_matches('$'))
            .map_err(|_| DashboardError::validation("stake", "must be a number"))?;
        check_stake(stake).map_err(|e| DashboardError::validation("stake", e))?;

        let odds_raw = required_text(self.odds, "odds")?;
        let odds = match self.odds_format.as_deref().unwrap_or("american") {
            "american" => odds_raw
                .trim_start_matches('+')
                .parse::<i32>()
                .map(Odds::American)
                .map_err(|_| DashboardError::validation("odds", "must be whole American odds like -110 or +150"))?,
            "decimal" => Decimal::from_str(&odds_raw)
                .map(Odds::Decimal)
                .map_err(|_| DashboardError::validation("odds", "must be a payout multiplier like 2.5"))?,
            other => {
                return Err(DashboardError::validation(
                    "odds_format",
                    format!("unknown format '{}', use american or decimal", other),
                ))
            }
        };
        odds.check().map_err(|e| DashboardError::validation("odds", e))?;

        let outcome = match self.outcome.as_deref() {
            Some(o) if !o.trim().is_empty() => parse_outcome(o)?,
            _ => Outcome::Pending,
        };

        Ok(NewBet {
            user,
            date,
            description,
            legs,
            stake,
            odds,
            outcome,
        })
    }
}

/// Newest first, by date then entry order
pub fn sort_newest_first(bets: &mut [Bet]) {
    bets.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
}
