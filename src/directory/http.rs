//! HTTP-backed user directory
//!
//! Client for the application's user API. Every outgoing request is
//! decorated with the current bearer token, read from the shared token
//! cell at call time.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::r#trait::UserDirectory;
use crate::config::DirectoryConfig;
use crate::errors::AuthError;
use crate::token::TokenCell;
use crate::types::{AuthProvider, NewUser, User};

/// HTTP user directory client
pub struct HttpUserDirectory {
    base_url: String,
    client: reqwest::Client,
    token: TokenCell,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GetByAuthIdRequest<'a> {
    auth_user_id: &'a str,
    auth_provider: AuthProvider,
}

impl HttpUserDirectory {
    /// Build a directory client
    ///
    /// # Errors
    /// Returns `AuthError::Provider` if the HTTP client cannot be built.
    pub fn new(config: &DirectoryConfig, token: TokenCell) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AuthError::Provider(format!("http client init failed: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            token,
        })
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<User, AuthError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "user directory request");

        let request = self.token.bearer(self.client.post(&url)).json(body);
        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<User>()
                .await
                .map_err(|e| AuthError::Provider(format!("invalid directory response: {e}")))
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Err(AuthError::NotFound)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(AuthError::Provider(format!("directory returned {status}: {body}")))
        }
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn get_by_auth_id(
        &self,
        auth_user_id: &str,
        provider: AuthProvider,
    ) -> Result<User, AuthError> {
        self.post(
            "v1/users/get_by_auth_id",
            &GetByAuthIdRequest { auth_user_id, auth_provider: provider },
        )
        .await
    }

    async fn create(&self, new_user: NewUser) -> Result<User, AuthError> {
        self.post("v1/users/create", &new_user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn directory_for(server: &MockServer, token: TokenCell) -> HttpUserDirectory {
        let config = DirectoryConfig { base_url: server.base_url(), timeout_secs: 5 };
        HttpUserDirectory::new(&config, token).unwrap()
    }

    fn user_json() -> serde_json::Value {
        serde_json::json!({
            "id": "user-1",
            "authProvider": "google_identity_platform",
            "authUserId": "abc",
            "email": "a@x.com",
            "name": "a@x.com",
        })
    }

    #[tokio::test]
    async fn test_get_by_auth_id_sends_current_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/users/get_by_auth_id")
                    .header("authorization", "Bearer tok-1")
                    .json_body(serde_json::json!({
                        "authUserId": "abc",
                        "authProvider": "google_identity_platform",
                    }));
                then.status(200).json_body(user_json());
            })
            .await;

        let token = TokenCell::new();
        let directory = directory_for(&server, token.clone());

        // Token written after construction must still be picked up
        token.set(Some("tok-1".to_string()));

        let user = directory
            .get_by_auth_id("abc", AuthProvider::GoogleIdentityPlatform)
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(user.id, "user-1");
    }

    #[tokio::test]
    async fn test_missing_user_maps_to_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/users/get_by_auth_id");
                then.status(404);
            })
            .await;

        let directory = directory_for(&server, TokenCell::new());
        let err = directory
            .get_by_auth_id("nope", AuthProvider::GoogleIdentityPlatform)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::NotFound);
    }

    #[tokio::test]
    async fn test_create_posts_new_user() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/users/create").json_body(serde_json::json!({
                    "authProvider": "google_identity_platform",
                    "authUserId": "abc",
                    "email": "a@x.com",
                    "name": "a@x.com",
                }));
                then.status(200).json_body(user_json());
            })
            .await;

        let directory = directory_for(&server, TokenCell::new());
        let user = directory
            .create(NewUser {
                auth_provider: AuthProvider::GoogleIdentityPlatform,
                auth_user_id: "abc".to_string(),
                email: "a@x.com".to_string(),
                name: "a@x.com".to_string(),
            })
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(user.auth_user_id, "abc");
    }

    #[tokio::test]
    async fn test_server_error_is_provider_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/users/get_by_auth_id");
                then.status(500).body("boom");
            })
            .await;

        let directory = directory_for(&server, TokenCell::new());
        let err = directory
            .get_by_auth_id("abc", AuthProvider::GoogleIdentityPlatform)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "provider_error");
    }
}
