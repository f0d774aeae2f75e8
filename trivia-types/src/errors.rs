use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Rule violations surfaced to the presentation layer. These are terminal
/// for the attempted action; retrying without a state change cannot succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    #[error("match {match_id} not found")]
    MatchNotFound { match_id: String },
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("match is already completed")]
    MatchAlreadyCompleted,
    #[error("match already has a second player")]
    SeatAlreadyTaken,
    #[error("user {user_id} is not part of this match")]
    NotAParticipant { user_id: String },
    #[error("question {question_id} is missing from the catalogue")]
    QuestionNotFound { question_id: String },
    #[error("no user is logged in")]
    NotAuthenticated,
    #[error("no match is currently in progress")]
    NoActiveMatch,
}
