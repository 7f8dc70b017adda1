//! Session configuration management

use serde::{Deserialize, Serialize};

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Identity provider configuration
    pub google: GoogleConfig,

    /// User directory configuration
    pub directory: DirectoryConfig,
}

/// Google Identity Platform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// API key for the Identity Toolkit REST API
    pub api_key: Option<String>,

    /// API endpoint; overridable for tests
    pub endpoint: String,
}

/// User directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Base URL of the directory API
    pub base_url: String,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            google: GoogleConfig::default(),
            directory: DirectoryConfig::default(),
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://identitytoolkit.googleapis.com".to_string(),
        }
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001/api".to_string(),
            timeout_secs: 30,
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            google: GoogleConfig::from_env(),
            directory: DirectoryConfig::from_env(),
        }
    }
}

impl GoogleConfig {
    fn from_env() -> Self {
        Self {
            api_key: std::env::var("GOOGLE_IDENTITY_API_KEY").ok(),
            endpoint: std::env::var("GOOGLE_IDENTITY_ENDPOINT")
                .unwrap_or_else(|_| "https://identitytoolkit.googleapis.com".to_string()),
        }
    }
}

impl DirectoryConfig {
    fn from_env() -> Self {
        Self {
            base_url: std::env::var("USER_DIRECTORY_URL")
                .unwrap_or_else(|_| "http://localhost:8001/api".to_string()),
            timeout_secs: std::env::var("USER_DIRECTORY_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.directory.timeout_secs, 30);
        assert!(config.google.endpoint.starts_with("https://identitytoolkit"));
    }

    #[test]
    fn test_default_reads_no_environment() {
        // Env reads belong to `from_env`; `Default` is deterministic even
        // when the key variable is set in the process environment.
        std::env::set_var("GOOGLE_IDENTITY_API_KEY", "env-key");
        let config = GoogleConfig::default();
        std::env::remove_var("GOOGLE_IDENTITY_API_KEY");

        assert_eq!(config.api_key, None);
    }
}
