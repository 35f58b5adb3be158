//! Errors raised by the authentication layer.

use thiserror::Error;

use crate::auth::crypto::AuthCryptoError;

/// Failure while building the directory or checking credentials.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown username and wrong password are deliberately indistinguishable.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The same username was listed twice.
    #[error("Duplicate credential entry: {0}")]
    DuplicateUsername(String),

    /// Hashing or verification could not run.
    #[error("Crypto error: {0}")]
    Crypto(#[from] AuthCryptoError),
}

/// Result alias for [`AuthError`].
pub type Result<T> = std::result::Result<T, AuthError>;
