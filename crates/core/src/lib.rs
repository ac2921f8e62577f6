//! Foliotrack Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for the portfolio tracker.
//! It is database-agnostic and defines repository traits that are
//! implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod fx;
pub mod portfolio;
pub mod quotes;
pub mod sankey;
pub mod settings;
pub mod trades;
pub mod users;

pub use errors::Error;
pub use errors::Result;
