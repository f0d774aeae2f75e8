use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use tracing::{info, warn};

use crate::documents::{MATCH_RECORD, match_fields, match_from_record};
use crate::entities::{prelude::*, records};
use crate::error::StoreError;
use trivia_types::Match;

/// CRUD over Match documents.
///
/// Writes are full-document overwrites conditioned on the revision the
/// caller last read, so a racing writer surfaces as [`StoreError::Conflict`]
/// instead of a silent clobber.
pub struct MatchRepository {
    db: DatabaseConnection,
}

impl MatchRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persist a new open match for `player1_id` on `question_id`.
    pub async fn create_match(
        &self,
        player1_id: &str,
        question_id: &str,
    ) -> Result<Match, StoreError> {
        let mut record = Match::new(player1_id, question_id);
        let now = chrono::Utc::now();

        let model = records::ActiveModel {
            id: Set(record.id.clone()),
            record_type: Set(MATCH_RECORD.to_string()),
            fields: Set(match_fields(&record)),
            revision: Set(1),
            modified_at: Set(now.into()),
        };
        Records::insert(model).exec(&self.db).await?;

        record.revision = 1;
        record.modified_at = Some(now.to_rfc3339());
        info!(match_id = %record.id, player1_id, "created open match");
        Ok(record)
    }

    /// Overwrite the stored document with the caller's in-memory view.
    ///
    /// Succeeds only if the stored revision still equals `record.revision`;
    /// the returned match carries the bumped revision. Callers must re-fetch
    /// after a conflict before trying again.
    pub async fn save_match(&self, record: &Match) -> Result<Match, StoreError> {
        let expected = record.revision;
        let now = chrono::Utc::now();

        let result = Records::update_many()
            .col_expr(records::Column::Fields, Expr::value(match_fields(record)))
            .col_expr(records::Column::Revision, Expr::value(expected + 1))
            .col_expr(records::Column::ModifiedAt, Expr::value(now.fixed_offset()))
            .filter(records::Column::Id.eq(&record.id))
            .filter(records::Column::RecordType.eq(MATCH_RECORD))
            .filter(records::Column::Revision.eq(expected))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return match self.fetch_match(&record.id).await? {
                Some(_) => {
                    warn!(match_id = %record.id, expected, "conditional save lost a race");
                    Err(StoreError::Conflict {
                        id: record.id.clone(),
                        expected,
                    })
                }
                None => Err(StoreError::NotFound {
                    id: record.id.clone(),
                }),
            };
        }

        let mut saved = record.clone();
        saved.revision = expected + 1;
        saved.modified_at = Some(now.to_rfc3339());
        Ok(saved)
    }

    pub async fn fetch_match(&self, match_id: &str) -> Result<Option<Match>, StoreError> {
        let row = Records::find_by_id(match_id)
            .filter(records::Column::RecordType.eq(MATCH_RECORD))
            .one(&self.db)
            .await?;

        row.as_ref().map(match_from_record).transpose()
    }

    /// All matches with `is_completed == false`, in store order. Callers sort
    /// for display.
    pub async fn list_open_matches(&self) -> Result<Vec<Match>, StoreError> {
        let rows = Records::find()
            .filter(records::Column::RecordType.eq(MATCH_RECORD))
            .all(&self.db)
            .await?;

        let mut open = Vec::new();
        for row in &rows {
            let record = match_from_record(row)?;
            if !record.is_completed {
                open.push(record);
            }
        }
        Ok(open)
    }

    /// Administrative escape hatch: delete every open match, one record at a
    /// time. Not atomic; a mid-loop failure leaves the remainder in place.
    pub async fn delete_all_open_matches(&self) -> Result<usize, StoreError> {
        let open = self.list_open_matches().await?;
        let mut deleted = 0;
        for record in &open {
            Records::delete_by_id(&record.id).exec(&self.db).await?;
            deleted += 1;
        }
        info!(deleted, "deleted all open matches");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};

    async fn setup() -> MatchRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        MatchRepository::new(db)
    }

    #[tokio::test]
    async fn create_then_fetch_round_trips() {
        let repo = setup().await;

        let created = repo.create_match("p1", "q1").await.unwrap();
        assert_eq!(created.revision, 1);
        assert_eq!(created.current_round, 1);
        assert!(created.is_player1_turn);
        assert_eq!(created.player2_id, None);

        let mut fetched = repo.fetch_match(&created.id).await.unwrap().unwrap();
        assert!(fetched.modified_at.is_some());
        // Timestamp formatting may differ after the store round trip.
        fetched.modified_at = created.modified_at.clone();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn save_bumps_revision() {
        let repo = setup().await;
        let mut record = repo.create_match("p1", "q1").await.unwrap();

        record.player2_id = Some("p2".to_string());
        let saved = repo.save_match(&record).await.unwrap();
        assert_eq!(saved.revision, 2);

        let fetched = repo.fetch_match(&record.id).await.unwrap().unwrap();
        assert_eq!(fetched.player2_id.as_deref(), Some("p2"));
        assert_eq!(fetched.revision, 2);
    }

    #[tokio::test]
    async fn stale_revision_write_is_rejected() {
        let repo = setup().await;
        let record = repo.create_match("p1", "q1").await.unwrap();

        // Two clients read the same revision; the second save must lose.
        let mut view_a = record.clone();
        let mut view_b = record.clone();

        view_a.player1_answer = Some("5".to_string());
        repo.save_match(&view_a).await.unwrap();

        view_b.player2_id = Some("p2".to_string());
        let err = repo.save_match(&view_b).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { expected: 1, .. }));
        assert!(err.is_retryable());

        // The winning write survived untouched.
        let fetched = repo.fetch_match(&record.id).await.unwrap().unwrap();
        assert_eq!(fetched.player1_answer.as_deref(), Some("5"));
        assert_eq!(fetched.player2_id, None);
    }

    #[tokio::test]
    async fn saving_a_deleted_match_reports_not_found() {
        let repo = setup().await;
        let record = repo.create_match("p1", "q1").await.unwrap();
        repo.delete_all_open_matches().await.unwrap();

        let err = repo.save_match(&record).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn listing_skips_completed_matches() {
        let repo = setup().await;
        let open = repo.create_match("p1", "q1").await.unwrap();
        let mut done = repo.create_match("p2", "q2").await.unwrap();

        done.is_completed = true;
        repo.save_match(&done).await.unwrap();

        let listed = repo.list_open_matches().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, open.id);
    }

    #[tokio::test]
    async fn delete_all_open_matches_spares_completed_ones() {
        let repo = setup().await;
        repo.create_match("p1", "q1").await.unwrap();
        repo.create_match("p2", "q2").await.unwrap();
        let mut done = repo.create_match("p3", "q3").await.unwrap();
        done.is_completed = true;
        let done = repo.save_match(&done).await.unwrap();

        assert_eq!(repo.delete_all_open_matches().await.unwrap(), 2);
        assert!(repo.list_open_matches().await.unwrap().is_empty());
        assert!(repo.fetch_match(&done.id).await.unwrap().is_some());
    }
}
