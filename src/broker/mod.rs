//! Identity provider layer
//!
//! Performs actual login/sign-up/sign-out against a third-party identity
//! provider and emits asynchronous identity-change notifications.

pub mod r#trait;
pub mod google;
pub mod memory;

pub(crate) mod events;

pub use r#trait::IdentityBroker;
pub use google::GoogleIdentityBroker;
pub use memory::MemoryIdentityBroker;
