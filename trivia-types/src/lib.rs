pub mod errors;
pub mod match_record;
pub mod question;
pub mod user;

// Re-export all types
pub use errors::*;
pub use match_record::*;
pub use question::*;
pub use user::*;
