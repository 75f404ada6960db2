//! Core types for the bet tracker

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal places kept on computed profit (cents)
pub const CURRENCY_DP: u32 = 2;

/// Largest stake accepted on a bet
pub const MAX_STAKE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Largest American odds magnitude accepted, either side
pub const MAX_AMERICAN_ODDS: u32 = 100_000;

/// Largest payout multiplier accepted, the decimal twin of +100000
pub const MAX_MULTIPLIER: Decimal = Decimal::from_parts(1001, 0, 0, false, 0);

/// Outcome of a bet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pending,
    Won,
    Lost,
    Void,
}

impl Outcome {
    /// Won or lost. Pending and void bets never count toward the record.
    pub fn is_settled(&self) -> bool {
        matches!(self, Outcome::Won | Outcome::Lost)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Pending => "pending",
            Outcome::Won => "won",
            Outcome::Lost => "lost",
            Outcome::Void => "void",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Outcome::Pending),
            "won" | "win" => Ok(Outcome::Won),
            "lost" | "loss" => Ok(Outcome::Lost),
            "void" | "push" => Ok(Outcome::Void),
            other => Err(format!("unknown outcome '{}'", other)),
        }
    }
}

/// Price of a bet, either as American odds or a decimal payout multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", content = "value", rename_all = "lowercase")]
pub enum Odds {
    /// Moneyline odds, e.g. -110 or +150
    American(i32),
    /// Total payout per unit staked, e.g. 2.50
    Decimal(Decimal),
}

impl Odds {
    /// Validate the odds value
    pub fn check(&self) -> Result<(), String> {
        match self {
            Odds::American(a) if a.unsigned_abs() < 100 => {
                Err(format!("American odds must be <= -100 or >= +100, got {}", a))
            }
            Odds::American(a) if a.unsigned_abs() > MAX_AMERICAN_ODDS => Err(format!(
                "American odds must be within +/-{}, got {}",
                MAX_AMERICAN_ODDS, a
            )),
            Odds::Decimal(m) if *m < Decimal::ONE => {
                Err(format!("payout multiplier must be at least 1.0, got {}", m))
            }
            Odds::Decimal(m) if *m > MAX_MULTIPLIER => {
                Err(format!("payout multiplier must be at most {}, got {}", MAX_MULTIPLIER, m))
            }
            _ => Ok(()),
        }
    }

    /// Payout multiplier (stake included)
    pub fn multiplier(&self) -> Decimal {
        match *self {
            Odds::American(a) if a > 0 => Decimal::ONE + Decimal::from(a) / Decimal::ONE_HUNDRED,
            Odds::American(a) => Decimal::ONE + Decimal::ONE_HUNDRED / Decimal::from(a.unsigned_abs()),
            Odds::Decimal(m) => m,
        }
    }

    /// Net winnings for a winning stake, saturating at `Decimal::MAX`
    pub fn winnings(&self, stake: Decimal) -> Decimal {
        let raw = match *self {
            Odds::American(a) if a > 0 => stake.saturating_mul(Decimal::from(a)) / Decimal::ONE_HUNDRED,
            Odds::American(a) => {
                stake.saturating_mul(Decimal::ONE_HUNDRED) / Decimal::from(a.unsigned_abs())
            }
            Odds::Decimal(m) => stake.saturating_mul(m.saturating_sub(Decimal::ONE)),
        };
        round_currency(raw)
    }

    /// Storage tag for the odds column pair
    pub fn format_str(&self) -> &'static str {
        match self {
            Odds::American(_) => "american",
            Odds::Decimal(_) => "decimal",
        }
    }

    /// Storage value for the odds column pair
    pub fn value_string(&self) -> String {
        match self {
            Odds::American(a) => a.to_string(),
            Odds::Decimal(m) => m.to_string(),
        }
    }

    /// Rebuild from the stored column pair
    pub fn from_parts(format: &str, value: &str) -> Result<Self, String> {
        match format {
            "american" => value
                .trim_start_matches('+')
                .parse::<i32>()
                .map(Odds::American)
                .map_err(|e| format!("bad American odds '{}': {}", value, e)),
            "decimal" => Decimal::from_str(value)
                .map(Odds::Decimal)
                .map_err(|e| format!("bad decimal odds '{}': {}", value, e)),
            other => Err(format!("unknown odds format '{}'", other)),
        }
    }
}

impl fmt::Display for Odds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Odds::American(a) if *a > 0 => write!(f, "+{}", a),
            Odds::American(a) => write!(f, "{}", a),
            Odds::Decimal(m) => write!(f, "x{}", m),
        }
    }
}

/// Check a stake is within `0..=MAX_STAKE`
pub fn check_stake(stake: Decimal) -> Result<(), String> {
    if stake < Decimal::ZERO {
        Err("must not be negative".to_string())
    } else if stake > MAX_STAKE {
        Err(format!("must be at most {}", MAX_STAKE))
    } else {
        Ok(())
    }
}

/// Round a currency amount to cents, half away from zero
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Profit or loss of a bet for the given outcome
pub fn compute_profit(stake: Decimal, odds: &Odds, outcome: Outcome) -> Decimal {
    match outcome {
        Outcome::Won => odds.winnings(stake),
        Outcome::Lost => -stake,
        Outcome::Pending | Outcome::Void => Decimal::ZERO,
    }
}

/// A logged bet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: i64,
    pub user: String,
    pub date: NaiveDate,
    /// The game, e.g. "Caps vs Rangers"
    pub description: String,
    /// Legs of a parlay, free text
    pub legs: Option<String>,
    pub stake: Decimal,
    pub odds: Odds,
    pub outcome: Outcome,
    pub profit: Decimal,
    pub created_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

impl Bet {
    /// Shortened description for console tables
    pub fn short_description(&self, max_len: usize) -> String {
        if self.description.chars().count() > max_len {
            let cut: String = self.description.chars().take(max_len.saturating_sub(3)).collect();
            format!("{}...", cut)
        } else {
            self.description.clone()
        }
    }
}

/// A bet that has passed validation but has no id yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewBet {
    pub user: String,
    pub date: NaiveDate,
    pub description: String,
    pub legs: Option<String>,
    pub stake: Decimal,
    pub odds: Odds,
    pub outcome: Outcome,
}

impl NewBet {
    pub fn profit(&self) -> Decimal {
        compute_profit(self.stake, &self.odds, self.outcome)
    }
}

/// A game returned by the game-info feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameInfo {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub start_time: DateTime<Utc>,
    /// Feed status, e.g. "scheduled", "live", "final"
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,
}

impl GameInfo {
    pub fn is_final(&self) -> bool {
        self.status.eq_ignore_ascii_case("final")
    }

    pub fn matchup(&self) -> String {
        format!("{} @ {}", self.away_team, self.home_team)
    }
}
