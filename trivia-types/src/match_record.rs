use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Score at which a match is over.
pub const POINTS_TO_WIN: i32 = 3;

/// Which of the two seats a user occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub fn other(self) -> Self {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

/// Logical phase of a match, derived from field combinations rather than
/// stored, so the document itself cannot carry a stale tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum MatchPhase {
    /// No second player yet; joinable.
    Open,
    /// Both answers clear, one side's turn flag set.
    AwaitingFirstAnswer,
    /// Exactly one answer recorded.
    AwaitingSecondAnswer,
    /// Both answers recorded. Transient: consumed immediately by round
    /// evaluation, so a stored document should never be observed here.
    RoundResolved,
    Completed,
}

/// One two-player game session. The persisted document is the single source
/// of truth; in-memory copies are projections of the last fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Match {
    pub id: String,
    pub player1_id: String,
    pub player2_id: Option<String>,
    pub current_round: i32,
    pub player1_score: i32,
    pub player2_score: i32,
    pub current_question_id: String,
    /// Append-only question history; always ends with `current_question_id`.
    pub previous_question_ids: Vec<String>,
    pub player1_answer: Option<String>,
    pub player2_answer: Option<String>,
    pub player1_time: Option<f64>,
    pub player2_time: Option<f64>,
    pub is_player1_turn: bool,
    pub is_completed: bool,
    /// Store revision used for conditional writes; bumped on every save.
    pub revision: i64,
    /// Last store modification time (ISO 8601), set on load. Display only.
    pub modified_at: Option<String>,
}

impl Match {
    /// A fresh open match: round 1, empty scores, player 1 to act.
    pub fn new(player1_id: impl Into<String>, question_id: impl Into<String>) -> Self {
        let question_id = question_id.into();
        Self {
            id: Uuid::new_v4().to_string(),
            player1_id: player1_id.into(),
            player2_id: None,
            current_round: 1,
            player1_score: 0,
            player2_score: 0,
            current_question_id: question_id.clone(),
            previous_question_ids: vec![question_id],
            player1_answer: None,
            player2_answer: None,
            player1_time: None,
            player2_time: None,
            is_player1_turn: true,
            is_completed: false,
            revision: 0,
            modified_at: None,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        if self.is_completed {
            MatchPhase::Completed
        } else if self.player2_id.is_none() {
            MatchPhase::Open
        } else if self.player1_answer.is_some() && self.player2_answer.is_some() {
            MatchPhase::RoundResolved
        } else if self.player1_answer.is_some() || self.player2_answer.is_some() {
            MatchPhase::AwaitingSecondAnswer
        } else {
            MatchPhase::AwaitingFirstAnswer
        }
    }

    /// The seat a user occupies, if they are part of this match.
    pub fn seat_of(&self, user_id: &str) -> Option<PlayerSlot> {
        if self.player1_id == user_id {
            Some(PlayerSlot::One)
        } else if self.player2_id.as_deref() == Some(user_id) {
            Some(PlayerSlot::Two)
        } else {
            None
        }
    }

    /// Which seat acts next at a stable (both-answers-clear) point.
    pub fn acting_slot(&self) -> PlayerSlot {
        if self.is_player1_turn {
            PlayerSlot::One
        } else {
            PlayerSlot::Two
        }
    }

    pub fn score_of(&self, slot: PlayerSlot) -> i32 {
        match slot {
            PlayerSlot::One => self.player1_score,
            PlayerSlot::Two => self.player2_score,
        }
    }

    /// The seat that has reached the winning score, if any.
    pub fn winner(&self) -> Option<PlayerSlot> {
        if self.player1_score >= POINTS_TO_WIN {
            Some(PlayerSlot::One)
        } else if self.player2_score >= POINTS_TO_WIN {
            Some(PlayerSlot::Two)
        } else {
            None
        }
    }
}
