use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A single multiple-choice trivia item from the static catalogue.
///
/// Immutable after load. Ids are persisted inside Match documents, so they
/// must be stable across processes and devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TriviaQuestion {
    pub id: Uuid,
    pub prompt: String,
    pub answer: String,
    pub options: Vec<String>,
}

impl TriviaQuestion {
    /// The id in the string form used by Match documents.
    pub fn record_id(&self) -> String {
        self.id.to_string()
    }
}
