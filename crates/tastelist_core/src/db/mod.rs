//! Local SQLite cache behind `SqliteDocumentStore`.
//!
//! # Responsibility
//! - Name where a connection points (`DbTarget`) so open failures say which
//!   database could not be reached.
//! - Hand out connections whose `user_documents` table is ready for use.
//!
//! # Invariants
//! - A connection is returned only after every migration has been applied.
//! - A database written by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Where a local store connection points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    File(PathBuf),
    Memory,
}

impl DbTarget {
    /// Short label used in `db_open` log events.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

impl Display for DbTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Memory => f.write_str(":memory:"),
        }
    }
}

/// Local store failures.
#[derive(Debug)]
pub enum DbError {
    /// The database could not be opened or created.
    Open {
        target: DbTarget,
        source: rusqlite::Error,
    },
    /// A statement against an open connection failed.
    Query(rusqlite::Error),
    /// The file carries a schema this build does not know.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => {
                write!(f, "cannot open restaurant cache at {target}: {source}")
            }
            Self::Query(err) => write!(f, "restaurant cache query failed: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "restaurant cache schema {db_version} was written by a newer build (this build knows up to {latest_supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Query(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Query(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{DbError, DbTarget};
    use std::path::PathBuf;

    #[test]
    fn open_error_names_the_target() {
        let err = DbError::Open {
            target: DbTarget::File(PathBuf::from("/tmp/list.sqlite3")),
            source: rusqlite::Error::InvalidQuery,
        };
        assert!(err.to_string().contains("/tmp/list.sqlite3"));
        assert_eq!(DbTarget::Memory.to_string(), ":memory:");
        assert_eq!(DbTarget::Memory.mode(), "memory");
    }
}
