//! Client-side session orchestration
//!
//! ```text
//! authflow/
//! ├── types.rs          # core data model
//! ├── errors.rs         # error taxonomy
//! ├── config.rs         # configuration
//! ├── state.rs          # pure authentication state store
//! ├── token.rs          # outbound bearer-token propagation
//! ├── broker/           # identity provider layer
//! │   ├── trait.rs
//! │   ├── google.rs
//! │   └── memory.rs
//! ├── directory/        # user registry layer
//! │   ├── trait.rs
//! │   ├── http.rs
//! │   └── memory.rs
//! └── session.rs        # composition + orchestration
//! ```
//!
//! The identity broker notifies the session of identity changes; the
//! session resolves each identity into an application user through the
//! user directory (creating one on first sight) and commits the result to
//! the state store. UIs read projections and invoke `login` / `sign_up` /
//! `logout` through a [`SessionHandle`]; they never touch the broker or
//! directory directly.

pub mod broker;
pub mod config;
pub mod directory;
pub mod errors;
pub mod session;
pub mod state;
pub mod token;
pub mod types;

pub use broker::{GoogleIdentityBroker, IdentityBroker, MemoryIdentityBroker};
pub use config::AuthConfig;
pub use directory::{HttpUserDirectory, MemoryUserDirectory, UserDirectory};
pub use errors::AuthError;
pub use session::{SessionContext, SessionHandle};
pub use state::{AuthAction, SessionState};
pub use token::TokenCell;
pub use types::{
    AuthProvider, Identity, IdentityEvent, NewUser, Resolution, UnresolvedReason, User,
};
