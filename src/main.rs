//! Bet Tracker CLI
//!
//! Offline access to the bet log the dashboard uses.

use anyhow::Result;
use bet_tracker::bets::{sort_newest_first, CreateBetRequest};
use bet_tracker::stats::{self, percent_or_na};
use bet_tracker::{Bet, Config, Database, Outcome};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rust_decimal::Decimal;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "bet-tracker")]
#[command(about = "Log sports bets and report bankroll stats")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show totals, per-user breakdown and unit shares
    Summary,

    /// List bets, newest first
    List {
        /// Only bets by this user
        #[arg(short, long)]
        user: Option<String>,

        /// Maximum number of bets to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Record a new bet
    Add {
        /// Who placed the bet
        #[arg(short, long)]
        user: String,

        /// Game, e.g. "Caps vs Rangers"
        #[arg(short, long)]
        description: String,

        /// Stake in dollars
        #[arg(short, long)]
        stake: String,

        /// American odds (-110, +150), or a multiplier with --decimal
        #[arg(short, long, allow_hyphen_values = true)]
        odds: String,

        /// Treat --odds as a decimal payout multiplier
        #[arg(long)]
        decimal: bool,

        /// Date of the game (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        /// Parlay legs
        #[arg(long)]
        legs: Option<String>,

        /// pending, won, lost or void
        #[arg(long, default_value = "pending")]
        outcome: String,
    },

    /// Set the outcome of a bet
    Settle {
        /// Bet id
        id: i64,

        /// pending, won, lost or void
        outcome: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let db = Database::new(&config.database_path).await?;

    match cli.command {
        Commands::Summary => show_summary(&config, &db).await?,
        Commands::List { user, limit } => list_bets(&db, user.as_deref(), limit).await?,
        Commands::Add {
            user,
            description,
            stake,
            odds,
            decimal,
            date,
            legs,
            outcome,
        } => {
            let req = CreateBetRequest {
                user: Some(user),
                date,
                description: Some(description),
                legs,
                stake: Some(stake),
                odds: Some(odds),
                odds_format: Some(if decimal { "decimal" } else { "american" }.to_string()),
                outcome: Some(outcome),
            };
            let bet = db.append_bet(&req.validate(Utc::now().date_naive())?).await?;
            println!("{} bet #{} saved", "✓".green(), bet.id);
            print_bet(&bet);
        }
        Commands::Settle { id, outcome } => {
            let outcome: Outcome = outcome.parse().map_err(anyhow::Error::msg)?;
            let bet = db.update_outcome(id, outcome).await?;
            println!("{} bet #{} is now {}", "✓".green(), bet.id, bet.outcome);
            print_bet(&bet);
        }
    }

    Ok(())
}

fn money(amount: Decimal) -> String {
    let text = format!("${:.2}", amount);
    if amount > Decimal::ZERO {
        text.green().to_string()
    } else if amount < Decimal::ZERO {
        text.red().to_string()
    } else {
        text
    }
}

async fn show_summary(config: &Config, db: &Database) -> Result<()> {
    let bets = db.load_bets().await?;
    let summary = stats::summarize(&bets);

    println!("\n{}", "=".repeat(70));
    println!("  BET TRACKER SUMMARY");
    println!("{}\n", "=".repeat(70));

    println!("Overall:");
    println!("  Total Bets:      {}", summary.total_bets);
    println!("  Record (W-L):    {}", summary.record());
    println!("  Pending / Void:  {} / {}", summary.pending, summary.void);
    println!("  Win Rate:        {}", summary.win_rate_display());
    println!("  Total Staked:    ${:.2}", summary.total_staked);
    println!("  Profit/Loss:     {}", money(summary.total_profit));
    println!("  ROI:             {}", summary.roi_display());

    let users = stats::per_user(&bets);
    if !users.is_empty() {
        println!("\nBy User:");
        for (user, s) in &users {
            println!(
                "  {:<12} {:>3} bets | {:>7} | Win Rate: {:>6} | P/L: {}",
                user,
                s.total_bets,
                s.record(),
                percent_or_na(s.win_rate),
                money(s.total_profit)
            );
        }
    }

    if !config.syndicate.is_empty() {
        println!("\nUnit Shares:");
        for share in stats::unit_shares(summary.total_profit, &config.syndicate) {
            println!("  {:<12} {:>5} units | {}", share.user, share.units, money(share.profit));
        }
    }

    let series = stats::bankroll_series(&bets, None);
    if let Some(last) = series.last() {
        println!(
            "\nBankroll: {} over {} settled days (last {})",
            money(last.cumulative_profit),
            series.len(),
            last.date
        );
    } else {
        println!("\nNo settled bets yet.");
    }

    Ok(())
}

async fn list_bets(db: &Database, user: Option<&str>, limit: usize) -> Result<()> {
    let mut bets = match user {
        Some(u) => db.load_bets_for_user(u).await?,
        None => db.load_bets().await?,
    };
    sort_newest_first(&mut bets);

    if bets.is_empty() {
        println!("No bets yet.");
        return Ok(());
    }

    println!("BET HISTORY ({} total)", bets.len());
    println!("{}", "-".repeat(70));
    for bet in bets.iter().take(limit) {
        print_bet(bet);
    }

    Ok(())
}

fn print_bet(bet: &Bet) {
    let outcome = match bet.outcome {
        Outcome::Won => bet.outcome.to_string().green(),
        Outcome::Lost => bet.outcome.to_string().red(),
        Outcome::Pending => bet.outcome.to_string().yellow(),
        Outcome::Void => bet.outcome.to_string().dimmed(),
    };
    println!(
        "  #{:<4} {} {:<8} {:<30} ${:<8} {:>6} {:<8} {}",
        bet.id,
        bet.date,
        bet.user,
        bet.short_description(30),
        bet.stake,
        bet.odds.to_string(),
        outcome,
        money(bet.profit)
    );
    if let Some(legs) = &bet.legs {
        println!("        legs: {}", legs);
    }
}
