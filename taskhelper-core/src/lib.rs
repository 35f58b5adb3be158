//! # TaskHelper Core
//!
//! Framework-independent building blocks of the TaskHelper web application.
//!
//! ## Overview
//!
//! - **Routes**: the path templates served by the application ([`routes`])
//! - **Views**: the closed set of view identifiers a page handler may return
//!   ([`views`])
//! - **Authentication**: the fixed in-memory credential directory, Argon2id
//!   password hashing, the session store and the access policy ([`auth`])
//!
//! Nothing here knows about HTTP; `taskhelper-server` wires these pieces into
//! an axum router.
//!
//! ## Example
//!
//! ```no_run
//! use taskhelper_core::auth::{AuthCrypto, CredentialDirectory, Role};
//!
//! let crypto = AuthCrypto::new("pepper").unwrap();
//! let directory = CredentialDirectory::seeded(&crypto).unwrap();
//! let principal = directory
//!     .authenticate(&crypto, "helper@example.com", "helper123")
//!     .unwrap();
//! assert!(principal.has_role(Role::Helper));
//! ```

pub mod auth;
pub mod error;
pub mod routes;
pub mod views;

pub use error::{AuthError, Result};
pub use views::ViewId;
