//! Shared-password gate

use crate::api::server::AppState;
use crate::db::Session;
use crate::error::DashboardError;
use axum::{extract::State, http::StatusCode, Json};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Compare passwords by SHA-256 digest
pub fn password_matches(expected: &str, given: &str) -> bool {
    Sha256::digest(expected.as_bytes()) == Sha256::digest(given.as_bytes())
}

/// Resolve the bearer token to a live session
pub async fn require_session(
    state: &AppState,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Session, DashboardError> {
    let TypedHeader(auth) =
        auth.ok_or_else(|| DashboardError::Auth("Enter the password to enable editing".to_string()))?;

    state
        .db
        .get_session(auth.token())
        .await?
        .ok_or_else(|| DashboardError::Auth("Invalid or expired session".to_string()))
}

/// Exchange the shared password for a session token
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, DashboardError> {
    let expected = state
        .config
        .password
        .as_deref()
        .ok_or_else(|| DashboardError::Auth("Editing is disabled: no password configured".to_string()))?;

    if !password_matches(expected, &req.password) {
        warn!("Rejected login attempt");
        return Err(DashboardError::Auth("Wrong password".to_string()));
    }

    let removed = state.db.cleanup_expired_sessions().await?;
    if removed > 0 {
        debug!("Removed {} expired sessions", removed);
    }

    let session = state.db.create_session(state.config.session_ttl_hours).await?;
    info!("Editing unlocked until {}", session.expires_at);

    Ok(Json(LoginResponse {
        session_token: session.id,
        expires_at: session.expires_at,
    }))
}

/// End the current session
pub async fn logout(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<StatusCode, DashboardError> {
    let session = require_session(&state, auth).await?;
    state.db.delete_session(&session.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
