//! Identity broker trait definition

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::errors::AuthError;
use crate::types::{AuthProvider, IdentityEvent};

/// External identity provider
///
/// Credential errors from `login`/`sign_up` must reach the caller
/// unmodified so a UI can map them to field-level validation messages.
#[async_trait]
pub trait IdentityBroker: Send + Sync {
    /// Which provider this broker talks to
    fn provider(&self) -> AuthProvider;

    /// Authenticate with email + password
    async fn login(&self, email: &str, password: &str) -> Result<(), AuthError>;

    /// Create an account with email + password
    async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError>;

    /// End the current provider session
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Subscribe to identity-change notifications
    ///
    /// Fires immediately with the current identity snapshot (the provider
    /// invokes the handler on registration, including the first-load check),
    /// then on every session change, in order.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<IdentityEvent>;
}
