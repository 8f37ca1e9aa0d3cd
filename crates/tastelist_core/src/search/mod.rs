//! Client-side search and ordering over the restaurant collection.
//!
//! # Responsibility
//! - Derive the filtered/sorted list shown to the user.
//!
//! # Invariants
//! - Projections are never persisted.

pub mod projection;
