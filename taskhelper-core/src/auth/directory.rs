//! Fixed in-memory account directory.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::{crypto::AuthCrypto, role::Role};
use crate::error::{AuthError, Result};

/// The accounts every instance starts with: `(username, password, roles)`.
pub const SEED_ACCOUNTS: [(&str, &str, &[Role]); 3] = [
    ("user@example.com", "password123", &[Role::User]),
    ("helper@example.com", "helper123", &[Role::User, Role::Helper]),
    (
        "admin@example.com",
        "admin123",
        &[Role::User, Role::Helper, Role::Admin],
    ),
];

/// One in-memory credential entry. Holds the PHC hash, never the password.
#[derive(Debug, Clone)]
pub struct Credential {
    /// Login name, matched exactly.
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Roles granted to the account.
    pub roles: BTreeSet<Role>,
}

/// Identity established by a successful login or a resolved session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Authenticated username.
    pub username: String,
    /// Roles held at login time.
    pub roles: BTreeSet<Role>,
}

impl Principal {
    /// Whether `role` is among the principal's roles.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Immutable username → credential lookup, built once at startup.
#[derive(Debug, Default)]
pub struct CredentialDirectory {
    entries: BTreeMap<String, Credential>,
}

impl CredentialDirectory {
    /// Build a directory from plaintext `(username, password, roles)` tuples,
    /// hashing each password.
    pub fn from_accounts<'a, I>(crypto: &AuthCrypto, accounts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a [Role])>,
    {
        let mut entries = BTreeMap::new();
        for (username, password, roles) in accounts {
            if entries.contains_key(username) {
                return Err(AuthError::DuplicateUsername(username.to_string()));
            }
            let credential = Credential {
                username: username.to_string(),
                password_hash: crypto.hash_password(password)?,
                roles: roles.iter().copied().collect(),
            };
            entries.insert(username.to_string(), credential);
        }

        debug!(accounts = entries.len(), "credential directory built");
        Ok(Self { entries })
    }

    /// The three fixed accounts.
    pub fn seeded(crypto: &AuthCrypto) -> Result<Self> {
        Self::from_accounts(crypto, SEED_ACCOUNTS)
    }

    /// Number of accounts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the directory holds no accounts.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Credential entry for an exact username.
    pub fn get(&self, username: &str) -> Option<&Credential> {
        self.entries.get(username)
    }

    /// Role set for a username, if the account exists.
    pub fn roles_of(&self, username: &str) -> Option<&BTreeSet<Role>> {
        self.get(username).map(|credential| &credential.roles)
    }

    /// Usernames in sorted order.
    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Check a username/password pair. Unknown users and wrong passwords both
    /// yield [`AuthError::InvalidCredentials`].
    pub fn authenticate(
        &self,
        crypto: &AuthCrypto,
        username: &str,
        password: &str,
    ) -> Result<Principal> {
        let credential = self
            .entries
            .get(username)
            .ok_or(AuthError::InvalidCredentials)?;

        if !crypto.verify_password(password, &credential.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Principal {
            username: credential.username.clone(),
            roles: credential.roles.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::crypto::Argon2Settings;

    fn setup() -> (AuthCrypto, CredentialDirectory) {
        let crypto = AuthCrypto::with_settings("pepper", Argon2Settings::minimal()).unwrap();
        let directory = CredentialDirectory::seeded(&crypto).unwrap();
        (crypto, directory)
    }

    #[test]
    fn seeds_exactly_three_accounts() {
        let (_, directory) = setup();
        assert_eq!(directory.len(), 3);
        assert_eq!(
            directory.usernames().collect::<Vec<_>>(),
            vec!["admin@example.com", "helper@example.com", "user@example.com"]
        );
    }

    #[test]
    fn seeded_roles_match_accounts() {
        let (_, directory) = setup();
        let roles = |name| directory.roles_of(name).unwrap().iter().copied().collect::<Vec<_>>();
        assert_eq!(roles("user@example.com"), vec![Role::User]);
        assert_eq!(roles("helper@example.com"), vec![Role::User, Role::Helper]);
        assert_eq!(
            roles("admin@example.com"),
            vec![Role::User, Role::Helper, Role::Admin]
        );
    }

    #[test]
    fn stores_hashes_not_passwords() {
        let (_, directory) = setup();
        let credential = directory.get("user@example.com").unwrap();
        assert_ne!(credential.password_hash, "password123");
        assert!(credential.password_hash.starts_with("$argon2id$"));
    }

    #[test]
    fn authenticates_each_seed_account() {
        let (crypto, directory) = setup();
        for (username, password, roles) in SEED_ACCOUNTS {
            let principal = directory.authenticate(&crypto, username, password).unwrap();
            assert_eq!(principal.username, username);
            assert_eq!(principal.roles.len(), roles.len());
        }
    }

    #[test]
    fn wrong_password_and_unknown_user_look_the_same() {
        let (crypto, directory) = setup();
        assert!(matches!(
            directory.authenticate(&crypto, "user@example.com", "nope"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            directory.authenticate(&crypto, "ghost@example.com", "password123"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let (crypto, directory) = setup();
        assert!(
            directory
                .authenticate(&crypto, "USER@example.com", "password123")
                .is_err()
        );
    }

    #[test]
    fn rejects_duplicate_usernames() {
        let crypto = AuthCrypto::with_settings("pepper", Argon2Settings::minimal()).unwrap();
        let accounts: [(&str, &str, &[Role]); 2] =
            [("a@example.com", "x", &[Role::User]), ("a@example.com", "y", &[Role::Admin])];
        assert!(matches!(
            CredentialDirectory::from_accounts(&crypto, accounts),
            Err(AuthError::DuplicateUsername(name)) if name == "a@example.com"
        ));
    }
}
