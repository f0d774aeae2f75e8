use thiserror::Error;
use trivia_persistence::StoreError;
use trivia_types::GameError;

/// Per-action result classification for match mutations, so the presentation
/// layer can roll back optimistic state instead of silently diverging.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Transient store failure, including a lost conditional write.
    /// Re-fetch the match and try again.
    #[error("temporary store failure: {0}")]
    Retryable(#[source] StoreError),

    /// Game-rule violation; repeating the same action cannot succeed.
    #[error(transparent)]
    Rule(#[from] GameError),

    #[error("unrecoverable failure: {0}")]
    Fatal(anyhow::Error),
}

impl ActionError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ActionError::Retryable(_))
    }
}

impl From<StoreError> for ActionError {
    fn from(err: StoreError) -> Self {
        if err.is_retryable() {
            ActionError::Retryable(err)
        } else {
            ActionError::Fatal(anyhow::Error::new(err))
        }
    }
}

/// Login failures, surfaced as displayable text next to the login form.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("record store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    #[error("could not look up or create user: {0}")]
    Lookup(#[source] StoreError),

    #[error("failed to persist local session: {0}")]
    Session(#[source] std::io::Error),
}
