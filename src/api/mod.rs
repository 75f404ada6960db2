//! Web API module for the bet tracker
//!
//! Provides the REST endpoints and the static dashboard page.

pub mod routes;
pub mod server;

pub use server::{create_app, AppState};
