use std::{fmt, sync::Arc};

use anyhow::Context;
use taskhelper_core::auth::{
    AccessPolicy, AuthCrypto, CredentialDirectory, Principal, SessionStore,
};
use tracing::info;

use crate::infra::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_crypto: Arc<AuthCrypto>,
    pub directory: Arc<CredentialDirectory>,
    pub sessions: Arc<SessionStore>,
    pub policy: Arc<AccessPolicy>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("accounts", &self.directory.len())
            .field("sessions", &self.sessions.len())
            .field("policy", &self.policy.kind())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Hash the seed accounts and assemble the shared state.
    pub fn bootstrap(config: Arc<Config>) -> anyhow::Result<Self> {
        let auth_crypto = Arc::new(
            AuthCrypto::with_settings(config.auth.password_pepper.as_bytes(), config.auth.argon2)
                .context("failed to initialize authentication crypto helpers")?,
        );

        let directory = Arc::new(
            CredentialDirectory::seeded(&auth_crypto)
                .context("failed to build the credential directory")?,
        );
        info!(accounts = directory.len(), "credential directory ready");

        let sessions = Arc::new(SessionStore::new(
            Arc::clone(&auth_crypto),
            config.session.ttl,
        ));
        let policy = Arc::new(AccessPolicy::for_kind(config.security.access_policy));
        info!(policy = %policy.kind(), "access policy in effect");

        Ok(Self {
            config,
            auth_crypto,
            directory,
            sessions,
            policy,
        })
    }

    /// Verify credentials on the blocking pool; Argon2 is deliberately slow.
    pub async fn authenticate(
        &self,
        username: String,
        password: String,
    ) -> anyhow::Result<Option<Principal>> {
        let crypto = Arc::clone(&self.auth_crypto);
        let directory = Arc::clone(&self.directory);

        let outcome = tokio::task::spawn_blocking(move || {
            directory.authenticate(&crypto, &username, &password)
        })
        .await
        .context("credential verification task failed")?;

        match outcome {
            Ok(principal) => Ok(Some(principal)),
            Err(taskhelper_core::AuthError::InvalidCredentials) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
