//! Authentication and authorization primitives.
//!
//! The pieces compose in a fixed order per request: the session store
//! resolves the cookie token to a [`Principal`], and the [`AccessPolicy`]
//! decides whether that (possibly anonymous) principal may reach the matched
//! route. Login goes through the [`CredentialDirectory`], which verifies
//! passwords with [`AuthCrypto`].

pub mod crypto;
pub mod directory;
pub mod policy;
pub mod role;
pub mod session;

pub use crypto::{Argon2Settings, AuthCrypto, AuthCryptoError};
pub use directory::{Credential, CredentialDirectory, Principal, SEED_ACCOUNTS};
pub use policy::{
    AccessDecision, AccessPolicy, AccessPolicyKind, AccessRule, ParseAccessPolicyError,
};
pub use role::{ParseRoleError, Role};
pub use session::{Session, SessionStore, SessionToken};
