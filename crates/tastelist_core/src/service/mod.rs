//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate load, reducer, sync and projection for one signed-in user.
//! - Keep UI/FFI layers decoupled from storage details.
//! - Turn form input into validated reducer commands.

pub mod auth;
pub mod dialog;
pub mod guide;
pub mod restaurant_service;
pub mod session;
