//! Document store contracts and backends.
//!
//! # Responsibility
//! - Define the load/save contract for one document per user.
//! - Isolate SQLite and remote document API details from the session layer.
//!
//! # Invariants
//! - `save` always writes the complete collection, never a diff.
//! - A missing document is `Ok(None)`, not an error.
//! - Read paths reject invalid persisted documents instead of masking them.

pub mod document_store;
pub mod remote_store;
pub mod sqlite_store;
