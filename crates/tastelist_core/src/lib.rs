//! Core domain logic for TasteList.
//! This crate is the single source of truth for restaurant list invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod sync;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::collection::{
    CollectionCommand, CollectionError, CollectionResult, RestaurantCollection,
};
pub use model::restaurant::{Rating, Restaurant, RestaurantId, RestaurantValidationError};
pub use model::user::UserId;
pub use repo::document_store::{DocumentStore, StoreError, StoreResult};
pub use repo::remote_store::{DocumentApi, InMemoryDocumentApi, RemoteDocumentStore, RemoteError};
pub use repo::sqlite_store::SqliteDocumentStore;
pub use search::projection::{project, ListView, SortMode};
pub use service::dialog::{DialogController, DialogError, DialogState};
pub use service::restaurant_service::{LoadError, RestaurantSession};
pub use service::session::SessionContext;
pub use sync::save_worker::{SyncStatus, SyncStats};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
