use trivia_types::PlayerSlot;

/// One player's submission for the current round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundAnswer {
    pub answer: String,
    pub time: f64,
}

impl RoundAnswer {
    pub fn new(answer: impl Into<String>, time: f64) -> Self {
        Self {
            answer: answer.into(),
            time,
        }
    }
}

pub struct ScoringEngine;

impl ScoringEngine {
    /// Decide who takes the round point, if anyone.
    ///
    /// Both correct: the strictly faster submission wins; an exact time tie
    /// goes to player 1 so the outcome is deterministic. Exactly one correct:
    /// that player. Neither: no point, the round is a no-score tie.
    pub fn round_scorer(
        p1: &RoundAnswer,
        p2: &RoundAnswer,
        correct_answer: &str,
    ) -> Option<PlayerSlot> {
        let p1_correct = p1.answer == correct_answer;
        let p2_correct = p2.answer == correct_answer;

        match (p1_correct, p2_correct) {
            (true, true) => {
                if p2.time < p1.time {
                    Some(PlayerSlot::Two)
                } else {
                    Some(PlayerSlot::One)
                }
            }
            (true, false) => Some(PlayerSlot::One),
            (false, true) => Some(PlayerSlot::Two),
            (false, false) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faster_correct_answer_wins() {
        let p1 = RoundAnswer::new("5", 2.0);
        let p2 = RoundAnswer::new("5", 3.5);
        assert_eq!(
            ScoringEngine::round_scorer(&p1, &p2, "5"),
            Some(PlayerSlot::One)
        );
        assert_eq!(
            ScoringEngine::round_scorer(&p2, &p1, "5"),
            Some(PlayerSlot::Two)
        );
    }

    #[test]
    fn exact_time_tie_goes_to_player_one() {
        let p1 = RoundAnswer::new("5", 2.0);
        let p2 = RoundAnswer::new("5", 2.0);
        assert_eq!(
            ScoringEngine::round_scorer(&p1, &p2, "5"),
            Some(PlayerSlot::One)
        );
    }

    #[test]
    fn only_correct_player_scores_regardless_of_time() {
        let slow_correct = RoundAnswer::new("5", 30.0);
        let fast_wrong = RoundAnswer::new("7", 0.5);
        assert_eq!(
            ScoringEngine::round_scorer(&slow_correct, &fast_wrong, "5"),
            Some(PlayerSlot::One)
        );
        assert_eq!(
            ScoringEngine::round_scorer(&fast_wrong, &slow_correct, "5"),
            Some(PlayerSlot::Two)
        );
    }

    #[test]
    fn no_point_when_neither_is_correct() {
        let p1 = RoundAnswer::new("3", 1.0);
        let p2 = RoundAnswer::new("8", 1.5);
        assert_eq!(ScoringEngine::round_scorer(&p1, &p2, "5"), None);
    }

    #[test]
    fn answers_compare_case_sensitively() {
        let p1 = RoundAnswer::new("mars", 1.0);
        let p2 = RoundAnswer::new("Mars", 2.0);
        assert_eq!(
            ScoringEngine::round_scorer(&p1, &p2, "Mars"),
            Some(PlayerSlot::Two)
        );
    }
}
