//! Axum server setup and configuration

use crate::api::routes;
use crate::games::GameFeed;
use crate::{Config, Database};
use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    response::Html,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
    pub games: Arc<GameFeed>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self> {
        let db = Database::new(&config.database_path).await?;
        let games = GameFeed::new(config.games.clone()).context("Failed to build HTTP client")?;

        Ok(Self {
            db: Arc::new(db),
            config: Arc::new(config),
            games: Arc::new(games),
        })
    }
}

/// Create the Axum application with all routes
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    // API routes
    let api_routes = Router::new()
        // Password gate
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout))
        // Dashboard view
        .route("/dashboard", get(routes::dashboard::get_dashboard))
        .route("/stats", get(routes::dashboard::get_stats))
        .route("/bankroll", get(routes::dashboard::get_bankroll))
        // Bet routes
        .route("/bets", get(routes::bets::list_bets).post(routes::bets::create_bet))
        .route("/bets/:id/outcome", post(routes::bets::update_outcome))
        // Game info
        .route("/games", get(routes::games::get_games));

    Router::new()
        .nest("/api", api_routes)
        .route("/", get(index))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Dashboard page
async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
