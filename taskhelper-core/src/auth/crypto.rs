//! Password hashing and session token primitives.

use argon2::{
    Algorithm, Argon2, Params, ParamsBuilder, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, Salt,
        SaltString,
    },
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{TryRngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroizing;

/// Centralized cryptographic helper for authentication-sensitive hashing.
///
/// The helper encapsulates two primitives:
/// - Argon2id for password hashing with a server-side pepper.
/// - SHA-256 for digesting opaque session tokens before they are used as
///   store keys, so the store never holds a usable token.
#[derive(Debug)]
pub struct AuthCrypto {
    argon2: Argon2<'static>,
    password_pepper: Zeroizing<Vec<u8>>,
}

/// Failure inside [`AuthCrypto`].
#[derive(Debug, Error)]
pub enum AuthCryptoError {
    /// Peppers must carry at least one byte.
    #[error("password pepper must not be empty")]
    EmptyPasswordPepper,
    /// Cost parameters outside what Argon2 accepts.
    #[error("invalid Argon2 parameters: {0}")]
    InvalidArgon2Params(String),
    /// Hashing failed or a stored hash is not a valid PHC string.
    #[error("password hashing error: {0}")]
    PasswordHash(String),
    /// The OS random source failed.
    #[error("random source unavailable: {0}")]
    Entropy(String),
}

impl From<PasswordHashError> for AuthCryptoError {
    fn from(err: PasswordHashError) -> Self {
        AuthCryptoError::PasswordHash(err.to_string())
    }
}

/// Tunable Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Settings {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Time cost (passes over memory).
    pub iterations: u32,
    /// Lanes.
    pub parallelism: u32,
}

impl Default for Argon2Settings {
    /// ~64 MiB memory and 3 iterations.
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 3,
            parallelism: 1,
        }
    }
}

impl Argon2Settings {
    /// Smallest parameters Argon2 accepts. Only for tests and constrained
    /// development machines.
    pub fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }

    fn to_params(self) -> Result<Params, AuthCryptoError> {
        ParamsBuilder::new()
            .m_cost(self.memory_kib)
            .t_cost(self.iterations)
            .p_cost(self.parallelism)
            .output_len(32)
            .build()
            .map_err(|err| AuthCryptoError::InvalidArgon2Params(err.to_string()))
    }
}

impl AuthCrypto {
    const SALT_LENGTH: usize = Salt::RECOMMENDED_LENGTH;
    const TOKEN_LENGTH: usize = 32;

    /// Build a helper with default Argon2id parameters.
    pub fn new(password_pepper: impl AsRef<[u8]>) -> Result<Self, AuthCryptoError> {
        Self::with_settings(password_pepper, Argon2Settings::default())
    }

    /// Build a helper with caller-specified Argon2 parameters.
    pub fn with_settings(
        password_pepper: impl AsRef<[u8]>,
        settings: Argon2Settings,
    ) -> Result<Self, AuthCryptoError> {
        let pepper = password_pepper.as_ref();
        if pepper.is_empty() {
            return Err(AuthCryptoError::EmptyPasswordPepper);
        }

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::default(), settings.to_params()?);

        Ok(Self {
            argon2,
            password_pepper: Zeroizing::new(pepper.to_vec()),
        })
    }

    fn peppered(&self, password: &str) -> Zeroizing<Vec<u8>> {
        let mut material =
            Zeroizing::new(Vec::with_capacity(password.len() + self.password_pepper.len()));
        material.extend_from_slice(password.as_bytes());
        material.extend_from_slice(&self.password_pepper);
        material
    }

    /// Hash a password using Argon2id with a random salt and the shared
    /// pepper. The result is a PHC string.
    pub fn hash_password(&self, password: &str) -> Result<String, AuthCryptoError> {
        let material = self.peppered(password);

        let mut salt_bytes = [0u8; Self::SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|err| AuthCryptoError::Entropy(err.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)?;
        let hash = self.argon2.hash_password(&material, &salt)?.to_string();
        Ok(hash)
    }

    /// Verify a password against a stored PHC string, applying the pepper.
    pub fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, AuthCryptoError> {
        let parsed = PasswordHash::new(password_hash)?;
        let material = self.peppered(password);

        Ok(self.argon2.verify_password(&material, &parsed).is_ok())
    }

    /// Generate an opaque 32-byte session token, base64url without padding.
    pub fn generate_token(&self) -> Result<String, AuthCryptoError> {
        let mut token_bytes = [0u8; Self::TOKEN_LENGTH];
        OsRng
            .try_fill_bytes(&mut token_bytes)
            .map_err(|err| AuthCryptoError::Entropy(err.to_string()))?;
        Ok(URL_SAFE_NO_PAD.encode(token_bytes))
    }

    /// Hex SHA-256 digest of a token, used as the session store key.
    pub fn hash_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crypto() -> AuthCrypto {
        AuthCrypto::with_settings("pepper", Argon2Settings::minimal()).unwrap()
    }

    #[test]
    fn hashes_passwords_and_verifies() {
        let crypto = crypto();
        let hash = crypto.hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(crypto.verify_password("correct horse", &hash).unwrap());
        assert!(!crypto.verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn pepper_is_part_of_the_hash_input() {
        let hash = crypto().hash_password("secret").unwrap();
        let other = AuthCrypto::with_settings("other", Argon2Settings::minimal()).unwrap();
        assert!(!other.verify_password("secret", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let crypto = crypto();
        let a = crypto.hash_password("secret").unwrap();
        let b = crypto.hash_password("secret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(matches!(
            crypto().verify_password("secret", "not-a-phc-string"),
            Err(AuthCryptoError::PasswordHash(_))
        ));
    }

    #[test]
    fn tokens_are_random_and_digests_hex() {
        let crypto = crypto();
        let a = crypto.generate_token().unwrap();
        let b = crypto.generate_token().unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);

        let digest = crypto.hash_token(&a);
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, crypto.hash_token(&a));
    }

    #[test]
    fn rejects_empty_pepper_and_bad_params() {
        assert!(matches!(
            AuthCrypto::new(""),
            Err(AuthCryptoError::EmptyPasswordPepper)
        ));
        let bad = Argon2Settings {
            memory_kib: 1,
            iterations: 1,
            parallelism: 1,
        };
        assert!(matches!(
            AuthCrypto::with_settings("pepper", bad),
            Err(AuthCryptoError::InvalidArgon2Params(_))
        ));
    }
}
