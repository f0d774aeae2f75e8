use anyhow::anyhow;
use sea_orm::DatabaseConnection;
use std::cmp::Reverse;
use tracing::info;

use trivia_core::{JoinOutcome, QuestionBank, RoundOutcome, TurnEngine};
use trivia_persistence::{MatchRepository, StoreError, UserRepository, connection};
use trivia_types::{GameError, Match, User};

use crate::config::Config;
use crate::error::{ActionError, AuthError};
use crate::session_store::SessionStore;
use crate::views::{MatchView, OpenMatchStatus, OpenMatchSummary, StoreStatus};

/// One client session: the current user, the current match projection, and
/// everything needed to act on them. All mutation happens through this one
/// context, mirroring the single UI-bound execution model of the app.
pub struct GameController {
    db: DatabaseConnection,
    users: UserRepository,
    matches: MatchRepository,
    bank: QuestionBank,
    session: SessionStore,
    current_user: Option<User>,
    current_match: Option<Match>,
}

impl GameController {
    pub fn new(db: DatabaseConnection, config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            users: UserRepository::new(db.clone()),
            matches: MatchRepository::new(db.clone()),
            db,
            bank: QuestionBank::builtin()?,
            session: SessionStore::new(&config.session_file),
            current_user: None,
            current_match: None,
        })
    }

    /// Probe the store; the result is shown as a status line at login.
    pub async fn store_status(&self) -> StoreStatus {
        match connection::ping(&self.db).await {
            Ok(()) => StoreStatus::Available,
            Err(err) => StoreStatus::Unavailable {
                detail: err.to_string(),
            },
        }
    }

    /// Restore the identity persisted by a previous launch, if any.
    pub fn restore_session(&mut self) -> Option<&User> {
        if self.current_user.is_none() {
            self.current_user = self.session.load();
        }
        self.current_user.as_ref()
    }

    pub async fn login(&mut self, display_name: &str) -> Result<User, AuthError> {
        let user = self
            .users
            .find_or_create(display_name)
            .await
            .map_err(|err| match err {
                unavailable @ StoreError::Database(_) => AuthError::StoreUnavailable(unavailable),
                other => AuthError::Lookup(other),
            })?;

        self.session.save(&user).map_err(AuthError::Session)?;
        info!(user_id = %user.id, "logged in");
        self.current_user = Some(user.clone());
        Ok(user)
    }

    pub fn logout(&mut self) -> std::io::Result<()> {
        self.current_user = None;
        self.current_match = None;
        self.session.clear()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn current_match(&self) -> Option<&Match> {
        self.current_match.as_ref()
    }

    pub fn match_view(&self) -> Option<MatchView> {
        let record = self.current_match.as_ref()?;
        self.view_of(record).ok()
    }

    /// Create a fresh open match on a random catalogue question.
    pub async fn start_new_game(&mut self) -> Result<MatchView, ActionError> {
        let user_id = self.require_user()?.id.clone();
        let question = self
            .bank
            .random_question(&[])
            .ok_or_else(|| ActionError::Fatal(anyhow!("question catalogue is empty")))?;

        let record = self
            .matches
            .create_match(&user_id, &question.record_id())
            .await?;
        let view = self.view_of(&record)?;
        self.current_match = Some(record);
        Ok(view)
    }

    /// The lobby list: open matches, most recently modified first, with
    /// display names resolved for labelling.
    pub async fn refresh_open_matches(&self) -> Result<Vec<OpenMatchSummary>, ActionError> {
        let my_id = self.require_user()?.id.clone();

        let mut records = self.matches.list_open_matches().await?;
        records.sort_by_key(|record| Reverse(modified_stamp(record)));

        let mut summaries = Vec::with_capacity(records.len());
        for record in records {
            let status = if record.player1_id == my_id {
                match &record.player2_id {
                    None => OpenMatchStatus::WaitingForOpponent,
                    Some(p2) => {
                        let opponent = self.users.resolve_display_name(p2).await;
                        if record.is_player1_turn {
                            OpenMatchStatus::YourTurn { opponent }
                        } else {
                            OpenMatchStatus::TheirTurn { opponent }
                        }
                    }
                }
            } else if record.player2_id.as_deref() == Some(my_id.as_str()) {
                let opponent = self.users.resolve_display_name(&record.player1_id).await;
                if record.is_player1_turn {
                    OpenMatchStatus::TheirTurn { opponent }
                } else {
                    OpenMatchStatus::YourTurn { opponent }
                }
            } else {
                let host = self.users.resolve_display_name(&record.player1_id).await;
                OpenMatchStatus::Joinable { host }
            };

            summaries.push(OpenMatchSummary {
                match_id: record.id.clone(),
                round: record.current_round,
                status,
                modified_at: record.modified_at.clone(),
            });
        }
        Ok(summaries)
    }

    /// Join an open match, or restore the local view when the user is
    /// already seated in it.
    pub async fn join_match(&mut self, match_id: &str) -> Result<MatchView, ActionError> {
        let user_id = self.require_user()?.id.clone();
        let mut record = self
            .matches
            .fetch_match(match_id)
            .await?
            .ok_or(ActionError::Rule(GameError::MatchNotFound {
                match_id: match_id.to_string(),
            }))?;

        let engine = TurnEngine::new(&self.bank);
        match engine.join(&mut record, &user_id)? {
            JoinOutcome::Rejoined => {}
            JoinOutcome::Joined => {
                record = self.matches.save_match(&record).await?;
            }
        }

        let view = self.view_of(&record)?;
        self.current_match = Some(record);
        Ok(view)
    }

    /// Record this user's answer for the current round.
    ///
    /// The transition runs on a copy; local state is only replaced once the
    /// conditional write succeeds, so a conflict leaves the optimistic view
    /// untouched and the caller can re-fetch and retry.
    pub async fn submit_answer(
        &mut self,
        answer: &str,
        elapsed_secs: f64,
    ) -> Result<RoundOutcome, ActionError> {
        let user_id = self.require_user()?.id.clone();
        let current = self
            .current_match
            .as_ref()
            .ok_or(ActionError::Rule(GameError::NoActiveMatch))?;

        let mut working = current.clone();
        let engine = TurnEngine::new(&self.bank);
        let outcome = engine.submit_answer(&mut working, &user_id, answer, elapsed_secs)?;

        let saved = self.matches.save_match(&working).await?;
        self.current_match = Some(saved);
        Ok(outcome)
    }

    /// Re-fetch the current match. The store pushes nothing, so an
    /// opponent's move or a round resolution is only discovered here.
    pub async fn refresh_current_match(&mut self) -> Result<Option<MatchView>, ActionError> {
        let Some(current) = self.current_match.as_ref() else {
            return Ok(None);
        };

        let fetched = self
            .matches
            .fetch_match(&current.id)
            .await?
            .ok_or(ActionError::Rule(GameError::MatchNotFound {
                match_id: current.id.clone(),
            }))?;

        let view = self.view_of(&fetched)?;
        self.current_match = Some(fetched);
        Ok(Some(view))
    }

    /// Back to menu: drops the local reference only. The persisted match is
    /// untouched and stays open for the opponent indefinitely.
    pub fn leave_match(&mut self) {
        self.current_match = None;
    }

    /// Administrative escape hatch; also drops the local match reference,
    /// which may itself have just been deleted.
    pub async fn delete_all_open_matches(&mut self) -> Result<usize, ActionError> {
        self.require_user()?;
        let deleted = self.matches.delete_all_open_matches().await?;
        self.current_match = None;
        Ok(deleted)
    }

    fn require_user(&self) -> Result<&User, ActionError> {
        self.current_user
            .as_ref()
            .ok_or(ActionError::Rule(GameError::NotAuthenticated))
    }

    fn view_of(&self, record: &Match) -> Result<MatchView, ActionError> {
        let user = self.require_user()?;
        let seat = record
            .seat_of(&user.id)
            .ok_or(ActionError::Rule(GameError::NotAParticipant {
                user_id: user.id.clone(),
            }))?;
        let question = self.bank.by_id(&record.current_question_id).cloned();
        Ok(MatchView::project(record, seat, question))
    }
}

fn modified_stamp(record: &Match) -> chrono::DateTime<chrono::Utc> {
    record
        .modified_at
        .as_deref()
        .and_then(|raw| chrono::DateTime::parse_from_rfc3339(raw).ok())
        .map(|stamp| stamp.with_timezone(&chrono::Utc))
        .unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC)
}
