//! Bet Tracker Web Server
//!
//! Serves the dashboard page and its JSON API.

use anyhow::Result;
use bet_tracker::api::{create_app, AppState};
use bet_tracker::Config;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging. Override with RUST_LOG, e.g. RUST_LOG=debug
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,bet_tracker=info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.require_password()?;
    let addr = config.bind_addr;

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║       BET TRACKER - WEB SERVER                               ║");
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!("║  Database:  {:<48} ║", config.database_path);
    println!("║  Game feed: {:<48} ║", if config.games.api_url.is_some() { "ENABLED" } else { "PLACEHOLDER" });
    println!("║  Syndicate: {:<48} ║", format!("{} members", config.syndicate.len()));
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    // Create application state
    info!("Initializing application state...");
    let state = AppState::new(config).await?;

    // Create the Axum app
    let app = create_app(state);

    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);
    println!("  Dashboard: http://{}/", addr);
    println!("  API:       http://{}/api", addr);
    println!("  Health:    http://{}/health", addr);
    println!();

    // Run the server
    axum::serve(listener, app).await?;

    Ok(())
}
