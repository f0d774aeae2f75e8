use tracing::info;
use trivia_types::{GameError, Match, PlayerSlot};

use crate::question_bank::QuestionBank;
use crate::scoring::{RoundAnswer, ScoringEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The user took the open second seat.
    Joined,
    /// The user was already seated; nothing was mutated, the caller should
    /// restore its local view from the fetched document.
    Rejoined,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoundOutcome {
    /// First answer of the round recorded; the other player acts next.
    AwaitingOpponent,
    /// Both answers were in: the round was scored and the next one set up.
    RoundComplete { scorer: Option<PlayerSlot> },
    /// The deciding submission pushed a score to the winning threshold.
    MatchOver { winner: PlayerSlot },
}

/// The match turn-state machine.
///
/// Pure logic over a Match value: callers fetch the document, apply a
/// transition here, and write the result back. Determinism lives entirely in
/// this type; global consistency is the store gateway's problem.
pub struct TurnEngine<'a> {
    bank: &'a QuestionBank,
}

impl<'a> TurnEngine<'a> {
    pub fn new(bank: &'a QuestionBank) -> Self {
        Self { bank }
    }

    /// Seat `user_id` as player 2 of an open match.
    ///
    /// Rejoining by either seated player is a mutation-free no-op; a third
    /// user joining an occupied match is rejected.
    pub fn join(&self, record: &mut Match, user_id: &str) -> Result<JoinOutcome, GameError> {
        if record.is_completed {
            return Err(GameError::MatchAlreadyCompleted);
        }
        if record.seat_of(user_id).is_some() {
            return Ok(JoinOutcome::Rejoined);
        }
        if record.player2_id.is_some() {
            return Err(GameError::SeatAlreadyTaken);
        }

        record.player2_id = Some(user_id.to_string());
        info!(match_id = %record.id, user_id, "player 2 joined match");
        Ok(JoinOutcome::Joined)
    }

    /// Record one player's answer for the current round.
    ///
    /// Flips the turn flag to the other seat; on the second answer of the
    /// round, evaluates scoring and either completes the match or advances
    /// to a fresh question.
    pub fn submit_answer(
        &self,
        record: &mut Match,
        user_id: &str,
        answer: &str,
        elapsed_secs: f64,
    ) -> Result<RoundOutcome, GameError> {
        if record.is_completed {
            return Err(GameError::MatchAlreadyCompleted);
        }
        let seat = record
            .seat_of(user_id)
            .ok_or_else(|| GameError::NotAParticipant {
                user_id: user_id.to_string(),
            })?;
        if record.acting_slot() != seat {
            return Err(GameError::NotYourTurn);
        }

        match seat {
            PlayerSlot::One => {
                record.player1_answer = Some(answer.to_string());
                record.player1_time = Some(elapsed_secs);
            }
            PlayerSlot::Two => {
                record.player2_answer = Some(answer.to_string());
                record.player2_time = Some(elapsed_secs);
            }
        }
        // The other seat acts next; on the deciding submission this also
        // picks who starts the next round.
        record.is_player1_turn = !record.is_player1_turn;

        if record.player1_answer.is_some() && record.player2_answer.is_some() {
            self.resolve_round(record)
        } else {
            Ok(RoundOutcome::AwaitingOpponent)
        }
    }

    fn resolve_round(&self, record: &mut Match) -> Result<RoundOutcome, GameError> {
        let question = self.bank.by_id(&record.current_question_id).ok_or_else(|| {
            GameError::QuestionNotFound {
                question_id: record.current_question_id.clone(),
            }
        })?;

        let (Some(a1), Some(t1), Some(a2), Some(t2)) = (
            record.player1_answer.take(),
            record.player1_time.take(),
            record.player2_answer.take(),
            record.player2_time.take(),
        ) else {
            // Unreachable from submit_answer; both answers were just checked.
            return Ok(RoundOutcome::AwaitingOpponent);
        };

        let p1 = RoundAnswer::new(a1, t1);
        let p2 = RoundAnswer::new(a2, t2);
        let scorer = ScoringEngine::round_scorer(&p1, &p2, &question.answer);

        match scorer {
            Some(PlayerSlot::One) => record.player1_score += 1,
            Some(PlayerSlot::Two) => record.player2_score += 1,
            None => {}
        }

        if let Some(winner) = record.winner() {
            record.is_completed = true;
            info!(
                match_id = %record.id,
                round = record.current_round,
                player1_score = record.player1_score,
                player2_score = record.player2_score,
                "match completed"
            );
            return Ok(RoundOutcome::MatchOver { winner });
        }

        record.current_round += 1;
        let next_id = self
            .bank
            .random_question(&record.previous_question_ids)
            .map(|q| q.record_id())
            // Degenerate catalogue with no distinct question left: repeat
            // the current one rather than stalling the match.
            .unwrap_or_else(|| record.current_question_id.clone());
        record.previous_question_ids.push(next_id.clone());
        record.current_question_id = next_id;

        info!(
            match_id = %record.id,
            round = record.current_round,
            scorer = ?scorer,
            "round resolved, advancing"
        );
        Ok(RoundOutcome::RoundComplete { scorer })
    }
}
