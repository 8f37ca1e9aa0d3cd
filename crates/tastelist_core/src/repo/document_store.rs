//! Store contract shared by the local and remote backends.

use crate::db::DbError;
use crate::model::document::DocumentError;
use crate::model::restaurant::Restaurant;
use crate::model::user::UserId;
use crate::repo::remote_store::RemoteError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store adapter failures.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Document(DocumentError),
    Remote(RemoteError),
    /// A previous panic left the backend lock poisoned.
    Poisoned(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Document(err) => write!(f, "{err}"),
            Self::Remote(err) => write!(f, "{err}"),
            Self::Poisoned(backend) => write!(f, "{backend} store lock poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Document(err) => Some(err),
            Self::Remote(err) => Some(err),
            Self::Poisoned(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Query(value))
    }
}

impl From<DocumentError> for StoreError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

impl From<RemoteError> for StoreError {
    fn from(value: RemoteError) -> Self {
        Self::Remote(value)
    }
}

/// Persistence contract for a user's restaurant document.
///
/// Implementations are shared with the background save worker, hence
/// `Send + Sync`.
pub trait DocumentStore: Send + Sync {
    /// Short backend name for diagnostics (`local`, `remote`).
    fn backend(&self) -> &'static str;

    /// Loads the user's collection. `Ok(None)` means no document exists yet.
    fn load(&self, user_id: &UserId) -> StoreResult<Option<Vec<Restaurant>>>;

    /// Overwrites the user's document with the full collection.
    fn save(&self, user_id: &UserId, restaurants: &[Restaurant]) -> StoreResult<()>;
}
