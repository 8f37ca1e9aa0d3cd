//! Restaurant domain model.
//!
//! # Responsibility
//! - Define the canonical restaurant record and its validation rules.
//! - Own the in-memory collection value every UI surface reads and writes.
//! - Define the persisted document shape and its legacy migration.
//!
//! # Invariants
//! - Every restaurant is identified by a stable `RestaurantId`.
//! - Ordering is never stored; it is derived by `search::projection`.

pub mod collection;
pub mod cuisine;
pub mod document;
pub mod restaurant;
pub mod user;
