//! Foliotrack HTTP server library: router, auth, and state wiring.

pub mod api;
pub mod auth;
pub mod config;
pub mod csrf;
pub mod error;
pub mod main_lib;
pub mod rate_limit;

pub use main_lib::{build_state, init_tracing, AppState};
