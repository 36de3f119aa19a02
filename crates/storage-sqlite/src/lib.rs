//! SQLite storage implementation for FinClue.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in `finclue-core`
//! and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for portfolios, watchlists, recipients, and
//!   the notification log
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. `finclue-core` is database-agnostic and works with traits.

pub mod db;
pub mod errors;
pub mod schema;

mod utils;

// Repository implementations
pub mod notification_log;
pub mod portfolios;
pub mod recipients;
pub mod watchlist;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors
pub use errors::StorageError;

// Re-export from finclue-core for convenience
pub use finclue_core::errors::{DatabaseError, Error, Result};
