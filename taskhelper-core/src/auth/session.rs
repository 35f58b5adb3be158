//! Server-side login sessions.

use std::{fmt, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    crypto::{AuthCrypto, AuthCryptoError},
    directory::Principal,
};

/// Raw session token as handed to the client. Only its digest is stored.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Token text for the session cookie.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// A logged-in principal with a fixed expiry.
#[derive(Debug, Clone)]
pub struct Session {
    /// Time-ordered identifier, safe to log.
    pub id: Uuid,
    /// Who logged in.
    pub principal: Principal,
    /// Login time.
    pub created_at: DateTime<Utc>,
    /// First instant at which the session is no longer honoured.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is still live at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Whether the session is live right now.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

/// In-memory session store keyed by token digest. Sessions die with the
/// process.
#[derive(Debug)]
pub struct SessionStore {
    crypto: Arc<AuthCrypto>,
    sessions: DashMap<String, Session>,
    ttl: chrono::Duration,
}

impl SessionStore {
    /// Empty store issuing sessions that live for `ttl`.
    pub fn new(crypto: Arc<AuthCrypto>, ttl: Duration) -> Self {
        Self {
            crypto,
            sessions: DashMap::new(),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
        }
    }

    /// Lifetime given to new sessions.
    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Stored sessions, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are stored.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Open a session for `principal` and return the raw token for the cookie.
    pub fn create(&self, principal: Principal) -> Result<(SessionToken, Session), AuthCryptoError> {
        let token = self.crypto.generate_token()?;
        let now = Utc::now();
        let session = Session {
            id: Uuid::now_v7(),
            principal,
            created_at: now,
            expires_at: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        self.sessions
            .insert(self.crypto.hash_token(&token), session.clone());
        info!(
            session_id = %session.id,
            username = %session.principal.username,
            "session created"
        );

        Ok((SessionToken(token), session))
    }

    /// Look up a live session. An expired entry is removed on sight.
    pub fn resolve(&self, token: &str) -> Option<Session> {
        let key = self.crypto.hash_token(token);
        let now = Utc::now();

        let session = self.sessions.get(&key).map(|entry| entry.value().clone())?;
        if session.is_valid_at(now) {
            return Some(session);
        }

        self.sessions
            .remove_if(&key, |_, stored| !stored.is_valid_at(now));
        debug!(session_id = %session.id, "expired session dropped on lookup");
        None
    }

    /// Remove the session named by `token`, returning it if it existed.
    pub fn invalidate(&self, token: &str) -> Option<Session> {
        let removed = self
            .sessions
            .remove(&self.crypto.hash_token(token))
            .map(|(_, session)| session);

        if let Some(session) = &removed {
            info!(
                session_id = %session.id,
                username = %session.principal.username,
                "session invalidated"
            );
        }
        removed
    }

    /// Drop every session expired as of `now`; returns how many were removed.
    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let initial_count = self.sessions.len();
        self.sessions.retain(|_, session| session.is_valid_at(now));
        let removed_count = initial_count.saturating_sub(self.sessions.len());

        if removed_count > 0 {
            info!("Cleaned up {} expired sessions", removed_count);
        }
        removed_count
    }

    /// [`SessionStore::purge_expired_at`] with the current time.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{crypto::Argon2Settings, role::Role};

    fn store(ttl: Duration) -> SessionStore {
        let crypto = AuthCrypto::with_settings("pepper", Argon2Settings::minimal()).unwrap();
        SessionStore::new(Arc::new(crypto), ttl)
    }

    fn principal(name: &str) -> Principal {
        Principal {
            username: name.to_string(),
            roles: [Role::User].into_iter().collect(),
        }
    }

    #[test]
    fn created_session_resolves_by_token() {
        let store = store(Duration::from_secs(60));
        let (token, session) = store.create(principal("user@example.com")).unwrap();

        let resolved = store.resolve(token.as_str()).unwrap();
        assert_eq!(resolved.id, session.id);
        assert_eq!(resolved.principal.username, "user@example.com");
        assert!(store.resolve("not-a-token").is_none());
    }

    #[test]
    fn store_keys_are_digests_not_tokens() {
        let store = store(Duration::from_secs(60));
        let (token, _) = store.create(principal("user@example.com")).unwrap();
        assert!(!store.sessions.contains_key(token.as_str()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn invalidate_removes_session() {
        let store = store(Duration::from_secs(60));
        let (token, _) = store.create(principal("user@example.com")).unwrap();

        assert!(store.invalidate(token.as_str()).is_some());
        assert!(store.resolve(token.as_str()).is_none());
        assert!(store.invalidate(token.as_str()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn expired_sessions_do_not_resolve() {
        let store = store(Duration::ZERO);
        let (token, _) = store.create(principal("user@example.com")).unwrap();

        assert!(store.resolve(token.as_str()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn purge_only_drops_expired_sessions() {
        let store = store(Duration::from_secs(60));
        let (live, _) = store.create(principal("user@example.com")).unwrap();
        store.create(principal("helper@example.com")).unwrap();

        assert_eq!(store.purge_expired(), 0);
        assert_eq!(store.purge_expired_at(Utc::now() + chrono::Duration::hours(1)), 2);
        assert!(store.resolve(live.as_str()).is_none());
    }

    #[test]
    fn token_debug_is_redacted() {
        let store = store(Duration::from_secs(60));
        let (token, _) = store.create(principal("user@example.com")).unwrap();
        assert_eq!(format!("{token:?}"), "SessionToken(..)");
    }
}
