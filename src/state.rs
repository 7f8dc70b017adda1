//! Authentication state store
//!
//! Pure reducer over explicit actions. No side effects, no async behavior;
//! deterministic given the action history. The session event loop is the
//! only writer; everyone else sees read-only snapshots.

use crate::types::User;

/// The application's view of current authentication state
///
/// Invariant: `current_user.is_some()` implies `inited == true`.
/// `loading` is true only while an in-flight login/sign-up call is
/// unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Resolved application user, if any
    pub current_user: Option<User>,
    /// True once the first identity check has completed
    pub inited: bool,
    /// True while an explicit login/sign-up call is in flight
    pub loading: bool,
    /// Bearer token of the current provider session
    pub token: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { current_user: None, inited: false, loading: false, token: None }
    }
}

/// State transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// An identity resolved to an application user
    LoggedIn { user: User, token: Option<String> },
    /// Identity check completed with no change to the current user
    AuthInited,
    /// Provider session ended; back to signed-out
    LoggedOut,
    /// Explicit login/sign-up call started
    AuthStarted,
    /// Explicit login/sign-up call settled (success or failure)
    AuthFinished,
}

impl SessionState {
    /// Apply one action, producing the next state
    pub fn apply(self, action: AuthAction) -> Self {
        match action {
            AuthAction::LoggedIn { user, token } => Self {
                current_user: Some(user),
                inited: true,
                loading: false,
                token,
            },
            AuthAction::AuthInited => Self { inited: true, ..self },
            AuthAction::LoggedOut => Self {
                current_user: None,
                inited: true,
                loading: false,
                token: None,
            },
            AuthAction::AuthStarted => Self { loading: true, ..self },
            AuthAction::AuthFinished => Self { loading: false, ..self },
        }
    }
}
