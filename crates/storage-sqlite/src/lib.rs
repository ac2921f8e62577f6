//! SQLite storage implementation for Foliotrack.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `foliotrack-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist; `core` is database-agnostic and works with traits. Reads go through
//! the r2d2 pool, writes through a single-writer actor that serializes them
//! inside immediate transactions.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod sankey;
pub mod settings;
pub mod trades;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, ping, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors
pub use errors::StorageError;

// Re-export from foliotrack-core for convenience
pub use foliotrack_core::errors::{DatabaseError, Error, Result};
