//! Local on-device document store backed by SQLite.
//!
//! # Invariants
//! - One row per user id in `user_documents`; saves upsert the whole body.
//! - The connection is only touched while holding the store mutex.

use crate::db::{open_db, open_db_in_memory};
use crate::model::document::{decode_document_str, encode_document_string, DOCUMENT_SCHEMA_VERSION};
use crate::model::restaurant::Restaurant;
use crate::model::user::UserId;
use crate::repo::document_store::{DocumentStore, StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const BACKEND: &str = "local";

/// SQLite-backed fallback store keyed by user id.
pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
}

impl SqliteDocumentStore {
    /// Opens (or creates) the store file and applies migrations.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned(BACKEND))
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn load(&self, user_id: &UserId) -> StoreResult<Option<Vec<Restaurant>>> {
        let conn = self.lock()?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM user_documents WHERE user_id = ?1;",
                [user_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            Some(text) => Ok(Some(decode_document_str(&text)?)),
            None => Ok(None),
        }
    }

    fn save(&self, user_id: &UserId, restaurants: &[Restaurant]) -> StoreResult<()> {
        let body = encode_document_string(restaurants)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO user_documents (user_id, body, schema_version, updated_at)
             VALUES (?1, ?2, ?3, (strftime('%s', 'now') * 1000))
             ON CONFLICT(user_id) DO UPDATE SET
                body = excluded.body,
                schema_version = excluded.schema_version,
                updated_at = excluded.updated_at;",
            params![user_id.as_str(), body, DOCUMENT_SCHEMA_VERSION],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteDocumentStore;
    use crate::model::restaurant::{Restaurant, RestaurantId};
    use crate::model::user::UserId;
    use crate::repo::document_store::{DocumentStore, StoreError};

    #[test]
    fn missing_document_loads_as_none() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        let user = UserId::parse("u1").unwrap();
        assert!(store.load(&user).unwrap().is_none());
    }

    #[test]
    fn save_overwrites_previous_document() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        let user = UserId::parse("u1").unwrap();
        let first = Restaurant::with_id(RestaurantId::from("1"), "Cafe A", "French");
        let second = Restaurant::with_id(RestaurantId::from("2"), "Bistro B", "Italian");

        store.save(&user, &[first.clone(), second]).unwrap();
        store.save(&user, &[first.clone()]).unwrap();

        assert_eq!(store.load(&user).unwrap(), Some(vec![first]));
    }

    #[test]
    fn documents_are_isolated_per_user() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        let alice = UserId::parse("alice").unwrap();
        let bob = UserId::parse("bob").unwrap();
        store
            .save(&alice, &[Restaurant::new("Cafe A", "French")])
            .unwrap();

        assert!(store.load(&bob).unwrap().is_none());
    }

    #[test]
    fn corrupt_body_is_a_document_error() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        let user = UserId::parse("u1").unwrap();
        store
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO user_documents (user_id, body, schema_version) VALUES ('u1', 'not json', 2);",
                [],
            )
            .unwrap();

        assert!(matches!(store.load(&user), Err(StoreError::Document(_))));
    }
}
