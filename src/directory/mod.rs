//! User directory layer
//!
//! Maps a third-party identity to an application-level user record,
//! creating one if absent.

pub mod r#trait;
pub mod http;
pub mod memory;

pub use r#trait::UserDirectory;
pub use http::HttpUserDirectory;
pub use memory::MemoryUserDirectory;
