use std::collections::HashMap;

use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use tokio::sync::RwLock;
use tracing::warn;

use crate::documents::{USER_RECORD, user_fields, user_from_record};
use crate::entities::{prelude::*, records};
use crate::error::StoreError;
use trivia_types::User;

/// Name shown when a user id cannot be resolved.
pub const PLACEHOLDER_NAME: &str = "someone";

/// CRUD over User documents plus the session-lifetime display-name cache.
pub struct UserRepository {
    db: DatabaseConnection,
    name_cache: RwLock<HashMap<String, String>>,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            name_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Authenticate by display name: exact, case-sensitive match on the
    /// stored name, first hit wins; otherwise create a fresh user.
    ///
    /// The store has no unique constraints, so two concurrent callers with
    /// the same unused name can both create a user. Accepted limitation.
    pub async fn find_or_create(&self, display_name: &str) -> Result<User, StoreError> {
        let rows = Records::find()
            .filter(records::Column::RecordType.eq(USER_RECORD))
            .all(&self.db)
            .await?;

        for row in &rows {
            let user = user_from_record(row)?;
            if user.display_name == display_name {
                return Ok(user);
            }
        }

        let user = User::with_name(display_name);
        let model = records::ActiveModel {
            id: Set(user.id.clone()),
            record_type: Set(USER_RECORD.to_string()),
            fields: Set(user_fields(&user)),
            revision: Set(1),
            modified_at: Set(chrono::Utc::now().into()),
        };
        Records::insert(model).exec(&self.db).await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let row = Records::find_by_id(user_id)
            .filter(records::Column::RecordType.eq(USER_RECORD))
            .one(&self.db)
            .await?;

        row.as_ref().map(user_from_record).transpose()
    }

    /// Cache-first display-name lookup, never failing: a miss or a store
    /// error resolves to the placeholder. The placeholder is cached too, so
    /// a later-appearing real name is not picked up until process restart.
    pub async fn resolve_display_name(&self, user_id: &str) -> String {
        if let Some(name) = self.name_cache.read().await.get(user_id) {
            return name.clone();
        }

        let resolved = match self.find_by_id(user_id).await {
            Ok(Some(user)) => user.display_name,
            Ok(None) => {
                warn!(user_id, "display name lookup found no user");
                PLACEHOLDER_NAME.to_string()
            }
            Err(err) => {
                warn!(user_id, error = %err, "display name lookup failed");
                PLACEHOLDER_NAME.to_string()
            }
        };

        self.name_cache
            .write()
            .await
            .insert(user_id.to_string(), resolved.clone());
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};

    async fn setup() -> (DatabaseConnection, UserRepository) {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        (db.clone(), UserRepository::new(db))
    }

    #[tokio::test]
    async fn find_or_create_is_stable_for_a_known_name() {
        let (_db, repo) = setup().await;

        let first = repo.find_or_create("Alice").await.unwrap();
        let second = repo.find_or_create("Alice").await.unwrap();
        assert_eq!(first, second);

        let found = repo.find_by_id(&first.id).await.unwrap().unwrap();
        assert_eq!(found.display_name, "Alice");
    }

    #[tokio::test]
    async fn name_matching_is_case_sensitive() {
        let (_db, repo) = setup().await;

        let lower = repo.find_or_create("alice").await.unwrap();
        let upper = repo.find_or_create("Alice").await.unwrap();
        assert_ne!(lower.id, upper.id);
    }

    #[tokio::test]
    async fn resolve_display_name_uses_store_then_cache() {
        let (_db, repo) = setup().await;
        let user = repo.find_or_create("Bob").await.unwrap();

        assert_eq!(repo.resolve_display_name(&user.id).await, "Bob");
        assert_eq!(repo.resolve_display_name(&user.id).await, "Bob");
    }

    #[tokio::test]
    async fn unknown_user_resolves_to_sticky_placeholder() {
        let (db, repo) = setup().await;

        // Miss caches the placeholder.
        assert_eq!(repo.resolve_display_name("ghost").await, PLACEHOLDER_NAME);

        // Even after the real record appears, the cached placeholder wins
        // for the rest of the process lifetime.
        let user = User {
            id: "ghost".to_string(),
            display_name: "Casper".to_string(),
        };
        let model = records::ActiveModel {
            id: Set(user.id.clone()),
            record_type: Set(USER_RECORD.to_string()),
            fields: Set(user_fields(&user)),
            revision: Set(1),
            modified_at: Set(chrono::Utc::now().into()),
        };
        Records::insert(model).exec(&db).await.unwrap();

        assert_eq!(repo.resolve_display_name("ghost").await, PLACEHOLDER_NAME);

        // A fresh repository (new process) sees the real name.
        let fresh = UserRepository::new(db);
        assert_eq!(fresh.resolve_display_name("ghost").await, "Casper");
    }
}
