//! Summary statistics and bankroll series over a set of bets
//!
//! Everything here is a pure function of the bet slice, so the dashboard can
//! recompute it on every request.

use crate::types::{round_currency, Bet, Outcome};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate figures for a set of bets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_bets: usize,
    pub pending: usize,
    pub won: usize,
    pub lost: usize,
    pub void: usize,
    pub total_staked: Decimal,
    /// Stake on won and lost bets only
    pub settled_staked: Decimal,
    pub total_profit: Decimal,
    /// won / (won + lost); `None` until something is settled
    pub win_rate: Option<f64>,
    /// total_profit / settled_staked; `None` until something is settled
    pub roi: Option<f64>,
}

impl Summary {
    /// Win-loss record, e.g. "3-2"
    pub fn record(&self) -> String {
        format!("{}-{}", self.won, self.lost)
    }

    pub fn win_rate_display(&self) -> String {
        percent_or_na(self.win_rate)
    }

    pub fn roi_display(&self) -> String {
        percent_or_na(self.roi)
    }
}

/// Format a ratio as a percentage, or "N/A" when undefined
pub fn percent_or_na(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.1}%", r * 100.0),
        None => "N/A".to_string(),
    }
}

/// One point of the bankroll chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankrollPoint {
    pub date: NaiveDate,
    pub cumulative_profit: Decimal,
}

/// A syndicate member's slice of the aggregate profit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitShare {
    pub user: String,
    pub units: Decimal,
    pub profit: Decimal,
}

/// Totals over every bet in the slice
pub fn summarize(bets: &[Bet]) -> Summary {
    let mut summary = Summary {
        total_bets: bets.len(),
        ..Summary::default()
    };

    for bet in bets {
        summary.total_staked = summary.total_staked.saturating_add(bet.stake);
        summary.total_profit = summary.total_profit.saturating_add(bet.profit);
        match bet.outcome {
            Outcome::Pending => summary.pending += 1,
            Outcome::Won => summary.won += 1,
            Outcome::Lost => summary.lost += 1,
            Outcome::Void => summary.void += 1,
        }
        if bet.outcome.is_settled() {
            summary.settled_staked = summary.settled_staked.saturating_add(bet.stake);
        }
    }

    let settled = summary.won + summary.lost;
    if settled > 0 {
        summary.win_rate = Some(summary.won as f64 / settled as f64);
    }
    if summary.settled_staked > Decimal::ZERO {
        summary.roi = summary
            .total_profit
            .checked_div(summary.settled_staked)
            .and_then(|r| r.to_f64());
    }

    summary
}

/// Summaries keyed by user, ordered by name
pub fn per_user(bets: &[Bet]) -> BTreeMap<String, Summary> {
    let mut grouped: BTreeMap<&str, Vec<Bet>> = BTreeMap::new();
    for bet in bets {
        grouped.entry(bet.user.as_str()).or_default().push(bet.clone());
    }

    grouped
        .into_iter()
        .map(|(user, bets)| (user.to_string(), summarize(&bets)))
        .collect()
}

/// Cumulative settled profit, one point per date, in date order.
///
/// Bets on the same date are folded into a single point. Pending and void
/// bets contribute nothing and produce no point of their own.
pub fn bankroll_series(bets: &[Bet], user: Option<&str>) -> Vec<BankrollPoint> {
    let mut daily: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for bet in bets
        .iter()
        .filter(|b| b.outcome.is_settled())
        .filter(|b| user.map_or(true, |u| b.user == u))
    {
        let day = daily.entry(bet.date).or_default();
        *day = day.saturating_add(bet.profit);
    }

    let mut running = Decimal::ZERO;
    daily
        .into_iter()
        .map(|(date, profit)| {
            running = running.saturating_add(profit);
            BankrollPoint {
                date,
                cumulative_profit: running,
            }
        })
        .collect()
}

/// One bankroll series per user
pub fn bankroll_by_user(bets: &[Bet]) -> BTreeMap<String, Vec<BankrollPoint>> {
    let users: std::collections::BTreeSet<&str> = bets.iter().map(|b| b.user.as_str()).collect();
    users
        .into_iter()
        .map(|user| (user.to_string(), bankroll_series(bets, Some(user))))
        .collect()
}

/// Split `total_profit` across members in proportion to their units.
///
/// With no units configured (or all zero) every member gets nothing.
pub fn unit_shares(total_profit: Decimal, members: &[(String, Decimal)]) -> Vec<UnitShare> {
    let total_units = members
        .iter()
        .fold(Decimal::ZERO, |acc, (_, units)| acc.saturating_add(*units));

    members
        .iter()
        .map(|(user, units)| {
            let profit = if total_units > Decimal::ZERO {
                round_currency(total_profit * (*units / total_units))
            } else {
                Decimal::ZERO
            };
            UnitShare {
                user: user.clone(),
                units: *units,
                profit,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{compute_profit, Odds};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn bet(id: i64, user: &str, day: u32, stake: Decimal, odds: Odds, outcome: Outcome) -> Bet {
        Bet {
            id,
            user: user.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 11, day).unwrap(),
            description: format!("game {}", id),
            legs: None,
            stake,
            odds,
            outcome,
            profit: compute_profit(stake, &odds, outcome),
            created_at: Utc::now(),
            settled_at: None,
        }
    }

    fn scenario() -> Vec<Bet> {
        vec![
            bet(1, "Alex", 3, dec!(10), Odds::Decimal(dec!(2)), Outcome::Won),
            bet(2, "Ben", 1, dec!(5), Odds::Decimal(dec!(1.9)), Outcome::Lost),
            bet(3, "Alex", 2, dec!(20), Odds::American(-110), Outcome::Pending),
        ]
    }

    #[test]
    fn test_empty_summary_is_zeroed() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_bets, 0);
        assert_eq!(summary.total_profit, Decimal::ZERO);
        assert_eq!(summary.total_staked, Decimal::ZERO);
        assert_eq!(summary.win_rate, None);
        assert_eq!(summary.win_rate_display(), "N/A");
        assert_eq!(summary.roi_display(), "N/A");
        assert!(bankroll_series(&[], None).is_empty());
        assert!(per_user(&[]).is_empty());
    }

    #[test]
    fn test_scenario_totals() {
        let summary = summarize(&scenario());
        assert_eq!(summary.total_bets, 3);
        assert_eq!(summary.total_profit, dec!(5));
        assert_eq!(summary.total_staked, dec!(35));
        assert_eq!(summary.win_rate, Some(0.5));
        assert_eq!(summary.record(), "1-1");
        assert_eq!(summary.pending, 1);
        // 5 profit on 15 settled stake
        assert!((summary.roi.unwrap() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_only_pending_and_void_has_no_win_rate() {
        let bets = vec![
            bet(1, "Alex", 1, dec!(10), Odds::Decimal(dec!(2)), Outcome::Pending),
            bet(2, "Alex", 1, dec!(10), Odds::Decimal(dec!(2)), Outcome::Void),
        ];
        let summary = summarize(&bets);
        assert_eq!(summary.win_rate, None);
        assert_eq!(summary.roi, None);
        assert_eq!(summary.total_profit, Decimal::ZERO);
    }

    #[test]
    fn test_per_user_sums_to_total() {
        let mut bets = scenario();
        bets.push(bet(4, "Chris", 4, dec!(12), Odds::American(130), Outcome::Won));
        bets.push(bet(5, "Ben", 5, dec!(7.5), Odds::American(-150), Outcome::Won));
        bets.push(bet(6, "Chris", 6, dec!(3), Odds::Decimal(dec!(4.2)), Outcome::Lost));

        let users = per_user(&bets);
        assert_eq!(users.keys().cloned().collect::<Vec<_>>(), vec!["Alex", "Ben", "Chris"]);

        let sum: Decimal = users.values().map(|s| s.total_profit).sum();
        assert_eq!(sum, summarize(&bets).total_profit);

        let bets_sum: usize = users.values().map(|s| s.total_bets).sum();
        assert_eq!(bets_sum, bets.len());
        assert_eq!(users["Alex"].win_rate, Some(1.0));
    }

    #[test]
    fn test_bankroll_series_is_date_ordered() {
        let series = bankroll_series(&scenario(), None);
        // pending bet on day 2 adds no point
        assert_eq!(
            series,
            vec![
                BankrollPoint {
                    date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
                    cumulative_profit: dec!(-5),
                },
                BankrollPoint {
                    date: NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
                    cumulative_profit: dec!(5),
                },
            ]
        );
        assert!(series.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_bankroll_folds_same_day_bets() {
        let bets = vec![
            bet(1, "Alex", 9, dec!(10), Odds::Decimal(dec!(2)), Outcome::Won),
            bet(2, "Ben", 9, dec!(4), Odds::Decimal(dec!(2)), Outcome::Lost),
            bet(3, "Ben", 2, dec!(4), Odds::Decimal(dec!(2)), Outcome::Won),
        ];
        let series = bankroll_series(&bets, None);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].cumulative_profit, dec!(4));
        assert_eq!(series[1].cumulative_profit, dec!(10));

        let ben = bankroll_series(&bets, Some("Ben"));
        assert_eq!(ben.last().unwrap().cumulative_profit, dec!(0));

        let by_user = bankroll_by_user(&bets);
        assert_eq!(by_user["Alex"].len(), 1);
        assert_eq!(by_user["Ben"].len(), 2);
    }

    #[test]
    fn test_unit_shares_follow_units() {
        let members = vec![
            ("Alex".to_string(), dec!(10)),
            ("Ben".to_string(), dec!(8)),
            ("Chris".to_string(), dec!(12)),
        ];
        let shares = unit_shares(dec!(300), &members);
        assert_eq!(shares[0].profit, dec!(100));
        assert_eq!(shares[1].profit, dec!(80));
        assert_eq!(shares[2].profit, dec!(120));

        let none = unit_shares(dec!(300), &[("Alex".to_string(), Decimal::ZERO)]);
        assert_eq!(none[0].profit, Decimal::ZERO);
        assert!(unit_shares(dec!(300), &[]).is_empty());
    }

    #[test]
    fn test_oversized_rows_do_not_break_summary() {
        // rows this large can only come from editing the table by hand
        let huge = dec!(50000000000000000000000000000);
        let bets = vec![
            bet(1, "Alex", 1, huge, Odds::Decimal(dec!(2)), Outcome::Lost),
            bet(2, "Alex", 2, huge, Odds::Decimal(dec!(2)), Outcome::Lost),
        ];

        let summary = summarize(&bets);
        assert_eq!(summary.total_staked, Decimal::MAX);
        assert_eq!(summary.total_profit, Decimal::MIN);
        assert_eq!(summary.record(), "0-2");

        let series = bankroll_series(&bets, None);
        assert_eq!(series.last().unwrap().cumulative_profit, Decimal::MIN);
        assert_eq!(unit_shares(Decimal::MIN, &[("Alex".to_string(), dec!(1))])[0].profit, Decimal::MIN);
    }
}
