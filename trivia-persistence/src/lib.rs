pub mod connection;
pub mod documents;
pub mod entities;
pub mod error;
pub mod repositories;

pub use error::StoreError;
pub use repositories::{MatchRepository, PLACEHOLDER_NAME, UserRepository};
