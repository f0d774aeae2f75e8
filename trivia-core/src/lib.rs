pub mod question_bank;
pub mod scoring;
pub mod turn_engine;

// Re-export main components
pub use question_bank::*;
pub use scoring::*;
pub use turn_engine::*;
