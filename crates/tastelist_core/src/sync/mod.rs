//! Mirroring of the in-memory collection to the document store.
//!
//! # Responsibility
//! - Detect settled collection changes and push full snapshots.
//! - Serialize saves so the stored document converges to the newest state.
//! - Expose save failures as a non-fatal status flag.
//!
//! # Invariants
//! - At most one save is in flight per session.
//! - At most one snapshot waits behind it; newer snapshots replace it.
//! - The initially loaded collection is never written back.

pub mod effect;
pub mod save_worker;
