//! Session module type definitions

use serde::{Deserialize, Serialize};

/// Application user record
///
/// Created by the user directory on first successful identity resolution,
/// otherwise fetched by `(auth_user_id, auth_provider)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID assigned by the directory
    pub id: String,
    /// Identity provider that authenticated this user
    pub auth_provider: AuthProvider,
    /// User ID on the provider side
    pub auth_user_id: String,
    /// Email
    pub email: String,
    /// Display name
    pub name: String,
}

/// Supported identity providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthProvider {
    GoogleIdentityPlatform,
}

impl AuthProvider {
    /// Stable wire name, matches the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoogleIdentityPlatform => "google_identity_platform",
        }
    }
}

/// Record from the third-party identity provider
///
/// `email` is present only when the provider verified one for this account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Provider-side unique ID
    pub uid: String,
    /// Verified email, if any
    pub email: Option<String>,
    /// Bearer token for outbound requests made on behalf of this identity
    pub id_token: Option<String>,
}

/// Payload of an identity-change notification
///
/// `None` means signed out / no active provider session, including the
/// initial check on startup.
pub type IdentityEvent = Option<Identity>;

/// Create request for the user directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub auth_provider: AuthProvider,
    pub auth_user_id: String,
    pub email: String,
    pub name: String,
}

/// Outcome of reconciling an external identity with the user directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The identity matched an existing user
    Resolved(User),
    /// First sight of this identity; a user was created for it
    Created(User),
    /// The identity could not be mapped to a user
    Unresolved(UnresolvedReason),
}

/// Why a reconciliation attempt produced no user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// Identity is unknown to the directory and carries no verified email,
    /// so a user cannot be created for it
    MissingEmail,
    /// The directory failed with something other than a lookup miss
    Directory(String),
}
