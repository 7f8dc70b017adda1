//! Outbound request token propagation
//!
//! The bearer token of the current provider session is held in a shared
//! cell written only by the session event loop and read by request
//! decorators at call time, never at registration time. This replaces any
//! free-floating ambient token variable with single-writer/multi-reader
//! access.

use std::sync::Arc;

use parking_lot::RwLock;

/// Shared holder of the current bearer token
#[derive(Debug, Clone, Default)]
pub struct TokenCell {
    inner: Arc<RwLock<Option<String>>>,
}

impl TokenCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current token. Called by the session event loop on every
    /// identity change.
    pub fn set(&self, token: Option<String>) {
        *self.inner.write() = token;
    }

    /// Latest token value
    pub fn get(&self) -> Option<String> {
        self.inner.read().clone()
    }

    /// Decorate an outgoing request with `Authorization: Bearer <token>`,
    /// reading the latest value at call time. Requests go out undecorated
    /// while no session is active.
    pub fn bearer(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.get() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}
