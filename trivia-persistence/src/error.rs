use thiserror::Error;

/// Gateway failures. The gateway never retries; classification into
/// retryable/fatal happens at the session layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Conditional write lost: someone else saved the record since our read.
    #[error("write conflict on record {id}: expected revision {expected}")]
    Conflict { id: String, expected: i64 },

    #[error("record {id} not found")]
    NotFound { id: String },

    #[error("malformed {record_type} record {id}")]
    Decode { record_type: String, id: String },
}

impl StoreError {
    /// Whether re-fetching and repeating the operation could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Database(_) | StoreError::Conflict { .. })
    }
}
