//! SQLite storage implementation for alert recipients.

mod model;
mod repository;

pub use model::AlertRecipientDB;
pub use repository::RecipientRepository;
