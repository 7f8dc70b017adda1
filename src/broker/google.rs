//! Google Identity Platform broker
//!
//! REST client for the Identity Toolkit API. Provider error codes are
//! mapped onto the crate error taxonomy so credential problems surface as
//! field-level validation errors.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::events::IdentityHub;
use super::r#trait::IdentityBroker;
use crate::config::GoogleConfig;
use crate::errors::AuthError;
use crate::types::{AuthProvider, Identity, IdentityEvent};

/// Google Identity Platform broker
pub struct GoogleIdentityBroker {
    config: GoogleConfig,
    client: reqwest::Client,
    hub: IdentityHub,
}

/// Successful response of `accounts:signInWithPassword` / `accounts:signUp`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: Option<String>,
    id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GoogleIdentityBroker {
    pub fn new(config: GoogleConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            hub: IdentityHub::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn account_url(&self, action: &str) -> Result<String, AuthError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AuthError::Provider("google api key not configured".to_string()))?;
        Ok(format!("{}/v1/accounts:{}?key={}", self.config.endpoint, action, key))
    }

    /// One credential exchange against the Identity Toolkit API
    async fn exchange(&self, action: &str, email: &str, password: &str) -> Result<Identity, AuthError> {
        let url = self.account_url(action)?;

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let code = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            warn!(action, code = %code, "identity provider rejected credential exchange");
            return Err(map_identity_error(&code));
        }

        let body: SignInResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("invalid identity response: {e}")))?;

        info!(action, uid = %body.local_id, "identity provider exchange succeeded");

        Ok(Identity {
            uid: body.local_id,
            email: body.email,
            id_token: body.id_token,
        })
    }
}

#[async_trait]
impl IdentityBroker for GoogleIdentityBroker {
    fn provider(&self) -> AuthProvider {
        AuthProvider::GoogleIdentityPlatform
    }

    async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let identity = self.exchange("signInWithPassword", email, password).await?;
        self.hub.publish(Some(identity));
        Ok(())
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let identity = self.exchange("signUp", email, password).await?;
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

/// Map an Identity Toolkit error code to the crate taxonomy
///
/// Codes attributable to a single credential field become field errors;
/// everything else is a generic auth failure carrying the raw code.
fn map_identity_error(code: &str) -> AuthError {
    match code {
        c if c.starts_with("WEAK_PASSWORD") => AuthError::field("password", c),
        "INVALID_PASSWORD" | "MISSING_PASSWORD" => AuthError::field("password", code),
        "EMAIL_NOT_FOUND" | "INVALID_EMAIL" | "EMAIL_EXISTS" | "MISSING_EMAIL" => {
            AuthError::field("email", code)
        }
        other => AuthError::Auth(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn broker_for(server: &MockServer) -> GoogleIdentityBroker {
        GoogleIdentityBroker::new(GoogleConfig {
            api_key: Some("test_key".to_string()),
            endpoint: server.base_url(),
        })
    }

    #[tokio::test]
    async fn test_login_emits_identity_event() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/accounts:signInWithPassword")
                    .query_param("key", "test_key");
                then.status(200).json_body(serde_json::json!({
                    "localId": "abc",
                    "email": "a@x.com",
                    "idToken": "jwt-123",
                }));
            })
            .await;

        let broker = broker_for(&server);
        let mut rx = broker.subscribe();
        assert_eq!(rx.recv().await.unwrap(), None); // initial snapshot

        broker.login("a@x.com", "hunter22").await.unwrap();
        mock.assert_async().await;

        let identity = rx.recv().await.unwrap().unwrap();
        assert_eq!(identity.uid, "abc");
        assert_eq!(identity.email.as_deref(), Some("a@x.com"));
        assert_eq!(identity.id_token.as_deref(), Some("jwt-123"));
    }

    #[tokio::test]
    async fn test_invalid_password_maps_to_field_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/accounts:signInWithPassword");
                then.status(400).json_body(serde_json::json!({
                    "error": { "message": "INVALID_PASSWORD" }
                }));
            })
            .await;

        let broker = broker_for(&server);
        let err = broker.login("a@x.com", "nope").await.unwrap_err();
        assert_eq!(err, AuthError::field("password", "INVALID_PASSWORD"));
    }

    #[tokio::test]
    async fn test_sign_up_weak_password() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/accounts:signUp");
                then.status(400).json_body(serde_json::json!({
                    "error": { "message": "WEAK_PASSWORD : Password should be at least 6 characters" }
                }));
            })
            .await;

        let broker = broker_for(&server);
        let err = broker.sign_up("a@x.com", "short").await.unwrap_err();
        match err {
            AuthError::FieldValidation { field, .. } => assert_eq!(field, "password"),
            other => panic!("expected field error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_code_is_generic_auth_error() {
        assert_eq!(
            map_identity_error("TOO_MANY_ATTEMPTS_TRY_LATER"),
            AuthError::Auth("TOO_MANY_ATTEMPTS_TRY_LATER".to_string())
        );
    }

    #[tokio::test]
    async fn test_unconfigured_broker_fails_without_network() {
        let broker = GoogleIdentityBroker::new(GoogleConfig {
            api_key: None,
            endpoint: "http://127.0.0.1:1".to_string(),
        });
        assert!(!broker.is_configured());

        let err = broker.login("a@x.com", "pw").await.unwrap_err();
        assert_eq!(err.error_code(), "provider_error");
    }
}
