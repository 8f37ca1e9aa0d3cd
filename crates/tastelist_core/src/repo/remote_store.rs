//! Remote document store adapter.
//!
//! # Responsibility
//! - Map a user's collection onto one document at `users/{user_id}` in a
//!   managed document database.
//! - Keep the database client behind the `DocumentApi` SPI so embedders can
//!   plug in their own transport.
//!
//! # Invariants
//! - Every save sends the complete document body.
//! - API failures are wrapped in `RemoteError` envelopes with a stable code.

use crate::model::document::{decode_document, encode_document};
use crate::model::restaurant::Restaurant;
use crate::model::user::UserId;
use crate::repo::document_store::{DocumentStore, StoreResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

const BACKEND: &str = "remote";
const USERS_COLLECTION: &str = "users";

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Error envelope returned by `DocumentApi` implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// Stable machine-readable code (`unavailable`, `permission_denied`, ...).
    pub code: String,
    /// Human-readable detail.
    pub message: String,
    /// Whether the same call may succeed later.
    pub retryable: bool,
}

impl RemoteError {
    pub fn new(code: impl Into<String>, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            retryable,
        }
    }
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "remote store error [{}]: {}", self.code, self.message)
    }
}

impl Error for RemoteError {}

/// Key-value document API of the managed database.
pub trait DocumentApi: Send + Sync {
    /// Reads one document. `Ok(None)` when it does not exist.
    fn get_document(&self, path: &str) -> RemoteResult<Option<Value>>;

    /// Replaces one document wholesale.
    fn set_document(&self, path: &str, body: Value) -> RemoteResult<()>;
}

/// Returns the document path that holds a user's collection.
pub fn user_document_path(user_id: &UserId) -> String {
    format!("{USERS_COLLECTION}/{user_id}")
}

/// `DocumentStore` over any `DocumentApi`.
pub struct RemoteDocumentStore<A: DocumentApi> {
    api: A,
}

impl<A: DocumentApi> RemoteDocumentStore<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}

impl<A: DocumentApi> DocumentStore for RemoteDocumentStore<A> {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn load(&self, user_id: &UserId) -> StoreResult<Option<Vec<Restaurant>>> {
        match self.api.get_document(&user_document_path(user_id))? {
            Some(body) => Ok(Some(decode_document(body)?)),
            None => Ok(None),
        }
    }

    fn save(&self, user_id: &UserId, restaurants: &[Restaurant]) -> StoreResult<()> {
        let body = encode_document(restaurants)?;
        self.api.set_document(&user_document_path(user_id), body)?;
        Ok(())
    }
}

/// Thread-safe in-process `DocumentApi`.
///
/// Persists exactly what it is given; useful for embedding without a
/// network backend and for exercising the remote adapter.
#[derive(Debug, Default)]
pub struct InMemoryDocumentApi {
    documents: Mutex<BTreeMap<String, Value>>,
}

impl InMemoryDocumentApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one raw document, e.g. one written by an older client.
    pub fn insert_raw(&self, path: impl Into<String>, body: Value) -> RemoteResult<()> {
        self.documents()?.insert(path.into(), body);
        Ok(())
    }

    /// Returns a copy of one raw document.
    pub fn raw(&self, path: &str) -> RemoteResult<Option<Value>> {
        Ok(self.documents()?.get(path).cloned())
    }

    fn documents(&self) -> RemoteResult<std::sync::MutexGuard<'_, BTreeMap<String, Value>>> {
        self.documents
            .lock()
            .map_err(|_| RemoteError::new("internal", "document map lock poisoned", false))
    }
}

impl DocumentApi for InMemoryDocumentApi {
    fn get_document(&self, path: &str) -> RemoteResult<Option<Value>> {
        self.raw(path)
    }

    fn set_document(&self, path: &str, body: Value) -> RemoteResult<()> {
        self.insert_raw(path, body)
    }
}

#[cfg(test)]
mod tests {
    use super::{user_document_path, InMemoryDocumentApi, RemoteDocumentStore};
    use crate::model::restaurant::{Restaurant, RestaurantId};
    use crate::model::user::UserId;
    use crate::repo::document_store::DocumentStore;
    use serde_json::json;

    #[test]
    fn document_path_is_namespaced_by_user() {
        let user = UserId::parse("uid-42").unwrap();
        assert_eq!(user_document_path(&user), "users/uid-42");
    }

    #[test]
    fn save_writes_full_versioned_document() {
        let store = RemoteDocumentStore::new(InMemoryDocumentApi::new());
        let user = UserId::parse("uid-42").unwrap();
        let restaurant = Restaurant::with_id(RestaurantId::from("1"), "Cafe A", "French");

        store.save(&user, &[restaurant]).unwrap();

        let raw = store.api().raw("users/uid-42").unwrap().unwrap();
        assert_eq!(raw["version"], 2);
        assert_eq!(raw["restaurants"][0]["name"], "Cafe A");
    }

    #[test]
    fn load_migrates_legacy_documents() {
        let api = InMemoryDocumentApi::new();
        api.insert_raw(
            "users/uid-42",
            json!({ "restaurants": [{ "id": "a", "name": "Old", "cuisine": "Thai", "isFavorite": true }] }),
        )
        .unwrap();
        let store = RemoteDocumentStore::new(api);

        let loaded = store.load(&UserId::parse("uid-42").unwrap()).unwrap().unwrap();
        assert_eq!(loaded[0].rating_value(), 5);
    }
}
