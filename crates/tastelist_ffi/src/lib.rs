//! Flutter-facing bindings for `tastelist_core`.

pub mod api;
