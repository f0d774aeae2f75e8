use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A player identity, created on first login by display name.
///
/// Names are not secrets and there is no credential check; the id is the
/// stable handle referenced by Match documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: String,
    pub display_name: String,
}

impl User {
    pub fn with_name(display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            display_name: display_name.into(),
        }
    }
}
