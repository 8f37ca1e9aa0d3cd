//! Explicit per-user session context.
//!
//! # Invariants
//! - A context exists only while a user is signed in.
//! - The context is the only holder of the user id and store handle that
//!   downstream services see; nothing reads ambient global state.

use crate::model::user::UserId;
use crate::repo::document_store::DocumentStore;
use crate::service::auth::AuthProvider;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No user is signed in.
    SignedOut,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignedOut => write!(f, "no user is signed in"),
        }
    }
}

impl Error for SessionError {}

/// User id plus the store that holds that user's document.
#[derive(Clone)]
pub struct SessionContext {
    user_id: UserId,
    store: Arc<dyn DocumentStore>,
}

impl SessionContext {
    pub fn new(user_id: UserId, store: Arc<dyn DocumentStore>) -> Self {
        Self { user_id, store }
    }

    /// Builds a context for the currently signed-in user.
    pub fn from_auth(
        auth: &dyn AuthProvider,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self, SessionError> {
        let user_id = auth.current_user_id().ok_or(SessionError::SignedOut)?;
        Ok(Self::new(user_id, store))
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("user_id", &self.user_id)
            .field("backend", &self.store.backend())
            .finish()
    }
}
