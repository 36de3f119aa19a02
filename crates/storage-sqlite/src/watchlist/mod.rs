//! SQLite storage implementation for watchlist entries.

mod model;
mod repository;

pub use model::WatchlistEntryDB;
pub use repository::WatchlistRepository;
