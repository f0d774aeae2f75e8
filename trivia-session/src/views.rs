use std::fmt;

use trivia_types::{Match, MatchPhase, PlayerSlot, TriviaQuestion};

/// Store reachability, shown inline at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreStatus {
    Available,
    Unavailable { detail: String },
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreStatus::Available => write!(f, "Record store: available"),
            StoreStatus::Unavailable { detail } => {
                write!(f, "Error: record store unavailable ({detail})")
            }
        }
    }
}

/// How one open match is presented in the lobby list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenMatchStatus {
    /// My match, no second player yet.
    WaitingForOpponent,
    YourTurn { opponent: String },
    TheirTurn { opponent: String },
    /// Someone else's open match I could join.
    Joinable { host: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenMatchSummary {
    pub match_id: String,
    pub round: i32,
    pub status: OpenMatchStatus,
    pub modified_at: Option<String>,
}

/// Projection of the current match for the presentation layer, recomputed
/// from the last-fetched document plus the viewer's seat.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchView {
    pub match_id: String,
    pub phase: MatchPhase,
    pub round: i32,
    pub my_seat: PlayerSlot,
    pub my_score: i32,
    pub opponent_score: i32,
    /// Missing only if the catalogue no longer knows the persisted id.
    pub question: Option<TriviaQuestion>,
    pub is_my_turn: bool,
    pub waiting_for_opponent: bool,
    pub is_over: bool,
    pub i_won: Option<bool>,
}

impl MatchView {
    pub fn project(record: &Match, my_seat: PlayerSlot, question: Option<TriviaQuestion>) -> Self {
        let phase = record.phase();
        Self {
            match_id: record.id.clone(),
            phase,
            round: record.current_round,
            my_seat,
            my_score: record.score_of(my_seat),
            opponent_score: record.score_of(my_seat.other()),
            question,
            is_my_turn: !record.is_completed && record.acting_slot() == my_seat,
            waiting_for_opponent: phase == MatchPhase::Open,
            is_over: record.is_completed,
            i_won: record.winner().map(|winner| winner == my_seat),
        }
    }
}
