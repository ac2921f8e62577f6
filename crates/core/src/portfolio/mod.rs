//! Portfolio module - live positions and aggregate P/L.

mod portfolio_model;
mod portfolio_service;
mod portfolio_traits;

pub use portfolio_model::{PortfolioSummary, Position};
pub use portfolio_service::PortfolioService;
pub use portfolio_traits::PortfolioServiceTrait;
