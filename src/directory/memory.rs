//! In-memory user directory (for development and tests)

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::r#trait::UserDirectory;
use crate::errors::AuthError;
use crate::types::{AuthProvider, NewUser, User};

/// In-memory directory, keyed by `(provider, auth_user_id)`
#[derive(Default)]
pub struct MemoryUserDirectory {
    users: Arc<RwLock<HashMap<(AuthProvider, String), User>>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn get_by_auth_id(
        &self,
        auth_user_id: &str,
        provider: AuthProvider,
    ) -> Result<User, AuthError> {
        let users = self.users.read().await;
        users
            .get(&(provider, auth_user_id.to_string()))
            .cloned()
            .ok_or(AuthError::NotFound)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, AuthError> {
        let mut users = self.users.write().await;
        let key = (new_user.auth_provider, new_user.auth_user_id.clone());
        if users.contains_key(&key) {
            return Err(AuthError::Provider(format!(
                "user already exists for auth id {}",
                new_user.auth_user_id
            )));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            auth_provider: new_user.auth_provider,
            auth_user_id: new_user.auth_user_id,
            email: new_user.email,
            name: new_user.name,
        };
        users.insert(key, user.clone());

        info!(id = %user.id, email = %user.email, "user created in memory directory");

        Ok(user)
    }
}
