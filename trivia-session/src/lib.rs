pub mod config;
pub mod controller;
pub mod error;
pub mod session_store;
pub mod views;

pub use config::Config;
pub use controller::GameController;
pub use error::{ActionError, AuthError};
pub use session_store::SessionStore;
pub use views::{MatchView, OpenMatchStatus, OpenMatchSummary, StoreStatus};
