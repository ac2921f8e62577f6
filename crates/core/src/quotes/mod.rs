//! Quotes module - bridge between domain services and market data providers.

mod quotes_service;
mod quotes_traits;

pub use quotes_service::QuoteService;
pub use quotes_traits::QuoteServiceTrait;
