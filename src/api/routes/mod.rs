//! API route handlers

pub mod auth;
pub mod bets;
pub mod dashboard;
pub mod games;
