//! Session orchestration
//!
//! Composes the identity broker and the user directory behind a single
//! read/call surface. The broker notifies of identity changes; the session
//! resolves each identity into an application user (creating one on first
//! sight) and commits the transition to the state store. Consumers read
//! projections through [`SessionHandle`] and never touch the broker or
//! directory directly.
//!
//! Identity-change notifications are processed strictly one at a time, in
//! arrival order: a single consumer task drains the broker's event channel,
//! so a second notification cannot start its resolve-or-create sequence
//! before the first's transition has committed. Two rapid-fire
//! notifications for the same new identity therefore cannot double-create
//! a user.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::broker::IdentityBroker;
use crate::config::AuthConfig;
use crate::directory::{HttpUserDirectory, UserDirectory};
use crate::errors::AuthError;
use crate::state::{AuthAction, SessionState};
use crate::token::TokenCell;
use crate::types::{Identity, IdentityEvent, NewUser, Resolution, UnresolvedReason, User};

/// Owner of the session state and sole writer of its transitions
pub struct SessionContext {
    broker: Arc<dyn IdentityBroker>,
    directory: Arc<dyn UserDirectory>,
    token: TokenCell,
    state_tx: watch::Sender<SessionState>,
}

impl SessionContext {
    /// Explicit composition root: collaborators are injected once at
    /// startup, so tests substitute fakes through the same constructor.
    pub fn new(
        broker: Arc<dyn IdentityBroker>,
        directory: Arc<dyn UserDirectory>,
        token: TokenCell,
    ) -> Arc<Self> {
        let (state_tx, _) = watch::channel(SessionState::default());
        Arc::new(Self { broker, directory, token, state_tx })
    }

    /// Production wiring: Google Identity Platform broker + HTTP user
    /// directory sharing one token cell.
    ///
    /// # Errors
    /// Returns `AuthError::Provider` if the directory client cannot be built.
    pub fn from_config(config: &AuthConfig) -> Result<Arc<Self>, AuthError> {
        let token = TokenCell::new();
        let broker = Arc::new(crate::broker::GoogleIdentityBroker::new(config.google.clone()));
        let directory = Arc::new(HttpUserDirectory::new(&config.directory, token.clone())?);
        Ok(Self::new(broker, directory, token))
    }

    /// Start the identity-event loop and hand out the consumer surface
    pub fn spawn(self: Arc<Self>) -> SessionHandle {
        let rx = self.broker.subscribe();
        let handle = Arc::clone(&self).handle();
        tokio::spawn(async move { self.run(rx).await });
        handle
    }

    /// Consumer surface without starting the event loop; used by tests that
    /// drive events manually.
    pub fn handle(self: Arc<Self>) -> SessionHandle {
        let state_rx = self.state_tx.subscribe();
        SessionHandle { ctx: self, state_rx }
    }

    async fn run(&self, mut rx: mpsc::UnboundedReceiver<IdentityEvent>) {
        while let Some(event) = rx.recv().await {
            self.process_event(event).await;
        }
        debug!("identity event channel closed; session loop exiting");
    }

    /// Handle one identity-change notification
    ///
    /// Returns the reconciliation outcome when one was attempted, so the
    /// unresolved case is observable instead of vanishing.
    pub(crate) async fn process_event(&self, event: IdentityEvent) -> Option<Resolution> {
        let has_user = self.state_tx.borrow().current_user.is_some();

        match event {
            Some(identity) if !has_user => {
                // The directory calls below authenticate as the new
                // identity, so the token must be visible before them.
                self.token.set(identity.id_token.clone());

                let resolution = self.reconcile(&identity).await;
                match &resolution {
                    Resolution::Resolved(user) | Resolution::Created(user) => {
                        self.apply(AuthAction::LoggedIn {
                            user: user.clone(),
                            token: identity.id_token.clone(),
                        });
                    }
                    Resolution::Unresolved(reason) => {
                        warn!(uid = %identity.uid, ?reason, "identity left unresolved");
                    }
                }
                Some(resolution)
            }
            None if has_user => {
                self.token.set(None);
                self.apply(AuthAction::LoggedOut);
                None
            }
            _ => {
                // No identity on first load, or a change while a user is
                // already resolved: mark the check complete and keep the
                // current user.
                self.apply(AuthAction::AuthInited);
                None
            }
        }
    }

    /// Resolve-or-create: reconcile an external identity with the user
    /// directory, exactly once per notification.
    async fn reconcile(&self, identity: &Identity) -> Resolution {
        let provider = self.broker.provider();

        match self.directory.get_by_auth_id(&identity.uid, provider).await {
            Ok(user) => {
                info!(uid = %identity.uid, id = %user.id, "identity resolved to existing user");
                Resolution::Resolved(user)
            }
            Err(AuthError::NotFound) => match &identity.email {
                Some(email) => {
                    let result = self
                        .directory
                        .create(NewUser {
                            auth_provider: provider,
                            auth_user_id: identity.uid.clone(),
                            email: email.clone(),
                            name: email.clone(),
                        })
                        .await;
                    match result {
                        Ok(user) => {
                            info!(uid = %identity.uid, id = %user.id, "user created on first sight");
                            Resolution::Created(user)
                        }
                        Err(e) => Resolution::Unresolved(UnresolvedReason::Directory(e.to_string())),
                    }
                }
                None => Resolution::Unresolved(UnresolvedReason::MissingEmail),
            },
            Err(e) => Resolution::Unresolved(UnresolvedReason::Directory(e.to_string())),
        }
    }

    fn apply(&self, action: AuthAction) {
        self.state_tx.send_modify(|state| {
            *state = state.clone().apply(action);
        });
    }

    /// Authenticate with the identity provider
    ///
    /// Broker errors reach the caller unmodified. On success the session
    /// update arrives through the identity-change notification, not here;
    /// the returned value is always `None`.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<User>, AuthError> {
        self.apply(AuthAction::AuthStarted);
        let result = self.broker.login(email, password).await;
        self.apply(AuthAction::AuthFinished);
        result?;
        Ok(None)
    }

    /// Create an account with the identity provider; same contract as
    /// [`login`](Self::login).
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Option<User>, AuthError> {
        self.apply(AuthAction::AuthStarted);
        let result = self.broker.sign_up(email, password).await;
        self.apply(AuthAction::AuthFinished);
        result?;
        Ok(None)
    }

    /// End the provider session; the downstream notification drives the
    /// state back to signed-out.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.broker.sign_out().await
    }
}

/// Read-only projection of the session plus callback handles
///
/// Cheap to clone; every clone observes the same session.
#[derive(Clone)]
pub struct SessionHandle {
    ctx: Arc<SessionContext>,
    state_rx: watch::Receiver<SessionState>,
}

impl SessionHandle {
    /// Current user, if resolved
    pub fn user(&self) -> Option<User> {
        self.state_rx.borrow().current_user.clone()
    }

    /// True once the first identity check has completed
    pub fn inited(&self) -> bool {
        self.state_rx.borrow().inited
    }

    /// True while an explicit login/sign-up call is in flight
    pub fn is_loading(&self) -> bool {
        self.state_rx.borrow().loading
    }

    /// The non-null user, or `AuthError::Unauthenticated` outside an
    /// authenticated context
    pub fn current_user(&self) -> Result<User, AuthError> {
        self.user().ok_or(AuthError::Unauthenticated)
    }

    /// Snapshot of the full session state
    pub fn state(&self) -> SessionState {
        self.state_rx.borrow().clone()
    }

    /// Change subscription over the session state
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Option<User>, AuthError> {
        self.ctx.login(email, password).await
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Option<User>, AuthError> {
        self.ctx.sign_up(email, password).await
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        self.ctx.logout().await
    }
}
