//! Authentication collaborator contract.
//!
//! Credential issuance lives outside this crate; the core only needs a
//! stable user id and a signal when it changes.

use crate::model::user::UserId;
use log::info;

/// Callback invoked with the new user id, or `None` on sign-out.
pub type AuthListener = Box<dyn FnMut(Option<&UserId>) + Send>;

/// Source of the signed-in user identity.
pub trait AuthProvider {
    /// Returns the signed-in user, if any.
    fn current_user_id(&self) -> Option<UserId>;

    /// Registers a listener for sign-in/sign-out transitions.
    fn on_auth_change(&mut self, listener: AuthListener);
}

/// Auth provider for a single local user (CLI, embedded demos).
#[derive(Default)]
pub struct LocalAuthProvider {
    current: Option<UserId>,
    listeners: Vec<AuthListener>,
}

impl LocalAuthProvider {
    /// Creates a provider with nobody signed in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider already signed in as `user_id`.
    pub fn signed_in(user_id: UserId) -> Self {
        Self {
            current: Some(user_id),
            listeners: Vec::new(),
        }
    }

    /// Signs in and notifies listeners. Re-signing the same user is silent.
    pub fn sign_in(&mut self, user_id: UserId) {
        if self.current.as_ref() == Some(&user_id) {
            return;
        }
        info!("event=auth_change module=auth status=signed_in");
        self.current = Some(user_id);
        self.notify();
    }

    /// Signs out and notifies listeners.
    pub fn sign_out(&mut self) {
        if self.current.take().is_some() {
            info!("event=auth_change module=auth status=signed_out");
            self.notify();
        }
    }

    fn notify(&mut self) {
        let current = self.current.clone();
        for listener in &mut self.listeners {
            listener(current.as_ref());
        }
    }
}

impl AuthProvider for LocalAuthProvider {
    fn current_user_id(&self) -> Option<UserId> {
        self.current.clone()
    }

    fn on_auth_change(&mut self, listener: AuthListener) {
        self.listeners.push(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthProvider, LocalAuthProvider};
    use crate::model::user::UserId;
    use std::sync::{Arc, Mutex};

    #[test]
    fn listeners_see_sign_in_and_sign_out() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut auth = LocalAuthProvider::new();
        auth.on_auth_change(Box::new(move |user| {
            sink.lock()
                .unwrap()
                .push(user.map(|id| id.as_str().to_string()));
        }));

        auth.sign_in(UserId::parse("u1").unwrap());
        auth.sign_in(UserId::parse("u1").unwrap());
        auth.sign_out();
        auth.sign_out();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some("u1".to_string()), None]
        );
        assert!(auth.current_user_id().is_none());
    }
}
