//! User directory trait definition

use async_trait::async_trait;

use crate::errors::AuthError;
use crate::types::{AuthProvider, NewUser, User};

/// Application user registry, keyed by `(auth_user_id, auth_provider)`
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch the user matching a provider identity
    ///
    /// Fails with `AuthError::NotFound` when no user matches.
    async fn get_by_auth_id(
        &self,
        auth_user_id: &str,
        provider: AuthProvider,
    ) -> Result<User, AuthError>;

    /// Create a user for a first-time identity
    async fn create(&self, new_user: NewUser) -> Result<User, AuthError>;
}
