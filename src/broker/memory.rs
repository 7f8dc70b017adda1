//! In-memory identity broker (for development and tests)

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use super::events::IdentityHub;
use super::r#trait::IdentityBroker;
use crate::errors::AuthError;
use crate::types::{AuthProvider, Identity, IdentityEvent};

const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    uid: String,
    password: String,
}

/// In-process account table with the same event semantics as a real
/// provider: successful login/sign-up publishes `Some(identity)`, sign-out
/// publishes `None`, and subscriptions start with the current snapshot.
#[derive(Default)]
pub struct MemoryIdentityBroker {
    accounts: Mutex<HashMap<String, Account>>,
    hub: IdentityHub,
}

impl MemoryIdentityBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account; returns its provider-side uid
    pub fn add_account(&self, email: &str, password: &str) -> String {
        let uid = Uuid::new_v4().to_string();
        self.accounts.lock().insert(
            email.to_string(),
            Account { uid: uid.clone(), password: password.to_string() },
        );
        uid
    }

    /// Inject a raw identity-change event, bypassing the account table.
    /// Lets tests drive arbitrary notification sequences, e.g. identities
    /// without an email.
    pub fn emit(&self, event: IdentityEvent) {
        self.hub.publish(event);
    }

    fn identity_for(&self, email: &str, uid: &str) -> Identity {
        Identity {
            uid: uid.to_string(),
            email: Some(email.to_string()),
            id_token: Some(format!("memtok-{uid}")),
        }
    }
}

#[async_trait]
impl IdentityBroker for MemoryIdentityBroker {
    fn provider(&self) -> AuthProvider {
        AuthProvider::GoogleIdentityPlatform
    }

    async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::field("password", "too_short"));
        }

        let identity = {
            let accounts = self.accounts.lock();
            let account = accounts
                .get(email)
                .ok_or_else(|| AuthError::field("email", "email_not_found"))?;
            if account.password != password {
                return Err(AuthError::field("password", "invalid_password"));
            }
            self.identity_for(email, &account.uid)
        };

        info!(email, "memory broker login");
        self.hub.publish(Some(identity));
        Ok(())
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::field("password", "too_short"));
        }

        let identity = {
            let mut accounts = self.accounts.lock();
            if accounts.contains_key(email) {
                return Err(AuthError::field("email", "email_exists"));
            }
            let uid = Uuid::new_v4().to_string();
            accounts.insert(
                email.to_string(),
                Account { uid: uid.clone(), password: password.to_string() },
            );
            self.identity_for(email, &uid)
        };

        info!(email, "memory broker sign-up");
        self.hub.publish(Some(identity));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.hub.publish(None);
        Ok(())
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<IdentityEvent> {
        self.hub.subscribe()
    }
}
