//! Session state for the habit tracker client.
//!
//! This module provides the [`Session`] type and its [`SessionState`]
//! machine. The session is the client-side record of whether a user is
//! authenticated and which profile fields describe them; all mutation goes
//! through the [`crate::SessionManager`].

use crate::auth::user::User;

/// The lifecycle states of a client session.
///
/// ```text
/// Unresolved -> Resolving -> Anonymous | Authenticated
/// Anonymous <-> Authenticated   (login / logout)
/// ```
///
/// `Unresolved` exists only between construction and the first
/// [`crate::SessionManager::restore`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Initial state; restore has not been attempted yet.
    Unresolved,
    /// The startup restore attempt is in flight.
    Resolving,
    /// No valid session exists.
    Anonymous,
    /// A valid session with a user record exists.
    Authenticated,
}

/// The client-side session record.
///
/// Invariant: `user` is `Some` only in the `Authenticated` state, which is
/// only entered after a token has been persisted and successfully exchanged
/// for a profile. The reverse does not hold transiently: a persisted token
/// may exist while the user is still being resolved.
#[derive(Clone, Debug)]
pub struct Session {
    state: SessionState,
    user: Option<User>,
}

impl Session {
    /// Creates an empty, unresolved session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SessionState::Unresolved,
            user: None,
        }
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the authenticated user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Returns `true` while the initial session restore has not completed.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Unresolved | SessionState::Resolving)
    }

    /// Returns `true` if a user record is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated)
    }

    pub(crate) fn set_resolving(&mut self) {
        self.state = SessionState::Resolving;
    }

    pub(crate) fn set_anonymous(&mut self) {
        self.state = SessionState::Anonymous;
        self.user = None;
    }

    pub(crate) fn set_authenticated(&mut self, user: User) {
        self.state = SessionState::Authenticated;
        self.user = Some(user);
    }

    pub(crate) fn user_mut(&mut self) -> Option<&mut User> {
        self.user.as_mut()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// Verify Session is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Session>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_session_is_unresolved_and_loading() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Unresolved);
        assert!(session.is_loading());
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_resolving_still_counts_as_loading() {
        let mut session = Session::new();
        session.set_resolving();
        assert!(session.is_loading());
    }

    #[test]
    fn test_anonymous_clears_user_and_loading() {
        let mut session = Session::new();
        session.set_authenticated(User::from_profile(&json!({"id": 1}), None));
        session.set_anonymous();

        assert_eq!(session.state(), SessionState::Anonymous);
        assert!(session.user().is_none());
        assert!(!session.is_loading());
    }

    #[test]
    fn test_authenticated_exposes_user() {
        let mut session = Session::new();
        session.set_authenticated(User::from_profile(
            &json!({"id": 1, "email": "a@b.com"}),
            None,
        ));

        assert!(session.is_authenticated());
        assert_eq!(session.user().unwrap().email, "a@b.com");
    }
}
