//! Restaurant session use-case service.
//!
//! # Responsibility
//! - Load a signed-in user's collection once at session start.
//! - Route every mutation through the reducer and mirror the result to the
//!   store through the sync effect.
//! - Serve the filtered/sorted list view.
//!
//! # Invariants
//! - The in-memory collection is authoritative for the session; the store
//!   is only read at `open`.
//! - A failed load yields no session (terminal error state, no retry).
//! - Save failures never fail a mutation; they surface via `sync_status`.

use crate::model::collection::{CollectionCommand, CollectionResult, RestaurantCollection};
use crate::model::restaurant::{Restaurant, RestaurantId};
use crate::model::user::UserId;
use crate::repo::document_store::StoreError;
use crate::search::projection::{ListView, ProjectionCache, SortMode};
use crate::service::session::SessionContext;
use crate::sync::effect::SyncEffect;
use crate::sync::save_worker::{SyncStats, SyncStatus, SyncWorker};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

/// Session start failure. The caller renders it as a blocking error.
#[derive(Debug)]
pub enum LoadError {
    Store(StoreError),
    /// The background save worker could not be started.
    Worker(std::io::Error),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "failed to load restaurants: {err}"),
            Self::Worker(err) => write!(f, "failed to start save worker: {err}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Worker(err) => Some(err),
        }
    }
}

impl From<StoreError> for LoadError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// One signed-in user's editing session.
pub struct RestaurantSession {
    context: SessionContext,
    collection: RestaurantCollection,
    sync: SyncEffect,
    projection: ProjectionCache,
}

impl RestaurantSession {
    /// Loads the user's document and starts the save worker.
    ///
    /// A missing document starts an empty collection.
    pub fn open(context: SessionContext) -> Result<Self, LoadError> {
        let started_at = Instant::now();
        let backend = context.store().backend();
        info!("event=collection_load module=service status=start backend={backend}");

        let loaded = match context.store().load(context.user_id()) {
            Ok(loaded) => loaded,
            Err(err) => {
                error!(
                    "event=collection_load module=service status=error backend={backend} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                return Err(err.into());
            }
        };

        let found = loaded.is_some();
        let collection = RestaurantCollection::initialize(loaded.unwrap_or_default());
        info!(
            "event=collection_load module=service status=ok backend={backend} found={found} count={} duration_ms={}",
            collection.len(),
            started_at.elapsed().as_millis()
        );

        let worker = SyncWorker::spawn(Arc::clone(context.store()), context.user_id().clone())
            .map_err(LoadError::Worker)?;
        let sync = SyncEffect::new(worker, &collection);

        Ok(Self {
            context,
            collection,
            sync,
            projection: ProjectionCache::new(),
        })
    }

    pub fn user_id(&self) -> &UserId {
        self.context.user_id()
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Current canonical collection.
    pub fn collection(&self) -> &RestaurantCollection {
        &self.collection
    }

    pub fn get(&self, id: &RestaurantId) -> Option<&Restaurant> {
        self.collection.get(id)
    }

    /// Applies one reducer command and schedules a save when it changed
    /// the collection.
    ///
    /// # Errors
    /// - `DuplicateId` / `NotFound` from the reducer; the collection is left
    ///   untouched.
    pub fn apply(&mut self, command: CollectionCommand) -> CollectionResult<&RestaurantCollection> {
        let op = command.op_name();
        match self.collection.apply(command) {
            Ok(next) => {
                self.collection = next;
                let scheduled = self.sync.observe(&self.collection);
                info!(
                    "event=collection_apply module=service status=ok op={op} count={} save_scheduled={scheduled}",
                    self.collection.len()
                );
                Ok(&self.collection)
            }
            Err(err) => {
                error!("event=collection_apply module=service status=error op={op} error={err}");
                Err(err)
            }
        }
    }

    /// Filtered and sorted restaurants; cached while inputs are unchanged.
    pub fn projection(&mut self, query: &str, sort: SortMode) -> Arc<[Restaurant]> {
        self.projection.project(&self.collection, query, sort)
    }

    /// List screen state for `query` and `sort`.
    pub fn list_view(&mut self, query: &str, sort: SortMode) -> ListView {
        let items = self.projection(query, sort);
        ListView::from_projection(&self.collection, items)
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.sync.status()
    }

    pub fn sync_stats(&self) -> SyncStats {
        self.sync.stats()
    }

    /// Blocks until every scheduled save has completed.
    pub fn flush(&self) {
        self.sync.flush();
    }

    /// Tears the session down (sign-out), draining queued saves first.
    pub fn close(self) {
        info!(
            "event=session_close module=service status=ok count={}",
            self.collection.len()
        );
        self.sync.shutdown();
    }
}
