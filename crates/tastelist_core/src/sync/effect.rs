//! Change observer that feeds the save queue.

use crate::model::collection::RestaurantCollection;
use crate::sync::save_worker::{SyncStats, SyncStatus, SyncWorker};
use log::debug;

/// Pushes a snapshot to the worker whenever the observed collection
/// revision changes.
///
/// The collection passed to `new` counts as already persisted, so loading
/// a document never triggers a write-back.
pub struct SyncEffect {
    worker: SyncWorker,
    last_observed: RestaurantCollection,
}

impl SyncEffect {
    pub fn new(worker: SyncWorker, initial: &RestaurantCollection) -> Self {
        Self {
            worker,
            last_observed: initial.clone(),
        }
    }

    /// Schedules a save when `collection` differs from the last observed
    /// revision. Returns whether a save was scheduled.
    pub fn observe(&mut self, collection: &RestaurantCollection) -> bool {
        if collection.same_revision(&self.last_observed) {
            debug!("event=sync_observe module=sync status=skip reason=unchanged");
            return false;
        }

        self.last_observed = collection.clone();
        self.worker.submit(collection.clone());
        true
    }

    pub fn status(&self) -> SyncStatus {
        self.worker.status()
    }

    pub fn stats(&self) -> SyncStats {
        self.worker.stats()
    }

    pub fn flush(&self) {
        self.worker.flush();
    }

    /// Drains queued saves and stops the worker.
    pub fn shutdown(self) {
        self.worker.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::SyncEffect;
    use crate::model::collection::RestaurantCollection;
    use crate::model::restaurant::{Restaurant, RestaurantId};
    use crate::model::user::UserId;
    use crate::repo::document_store::DocumentStore;
    use crate::repo::sqlite_store::SqliteDocumentStore;
    use crate::sync::save_worker::SyncWorker;
    use std::sync::Arc;

    #[test]
    fn initial_collection_is_not_written_back() {
        let store = Arc::new(SqliteDocumentStore::open_in_memory().unwrap());
        let user = UserId::anonymous();
        let initial = RestaurantCollection::initialize(vec![Restaurant::with_id(
            RestaurantId::from("1"),
            "Cafe A",
            "French",
        )]);
        let mut effect = SyncEffect::new(
            SyncWorker::spawn(store.clone(), user.clone()).unwrap(),
            &initial,
        );

        assert!(!effect.observe(&initial));
        assert!(!effect.observe(&initial.remove(&RestaurantId::from("missing"))));
        effect.flush();
        assert!(store.load(&user).unwrap().is_none());
        assert_eq!(effect.stats().completed, 0);
    }

    #[test]
    fn changed_revision_is_saved() {
        let store = Arc::new(SqliteDocumentStore::open_in_memory().unwrap());
        let user = UserId::anonymous();
        let initial = RestaurantCollection::new();
        let mut effect = SyncEffect::new(
            SyncWorker::spawn(store.clone(), user.clone()).unwrap(),
            &initial,
        );

        let next = initial.add(Restaurant::new("Cafe A", "French")).unwrap();
        assert!(effect.observe(&next));
        effect.shutdown();

        assert_eq!(store.load(&user).unwrap().map(|items| items.len()), Some(1));
    }
}
