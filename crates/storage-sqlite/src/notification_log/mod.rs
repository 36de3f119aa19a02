//! SQLite storage implementation for the notification dedup log.

mod model;
mod repository;

pub use model::NotificationLogDB;
pub use repository::NotificationLogRepository;
