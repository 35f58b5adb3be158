use std::{path::PathBuf, time::Duration};

use taskhelper_core::auth::{AccessPolicyKind, Argon2Settings};

/// Pepper used when none is configured. Fine for development only; the loader
/// warns when it is in effect outside dev mode.
pub const DEFAULT_PASSWORD_PEPPER: &str = "taskhelper-insecure-default-pepper";
pub const DEFAULT_SESSION_COOKIE: &str = "SESSIONID";
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(300);
pub const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub session: SessionConfig,
    pub security: SecurityConfig,
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub password_pepper: String,
    pub argon2: Argon2Settings,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("password_pepper", &"<redacted>")
            .field("argon2", &self.argon2)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl: Duration,
    pub sweep_interval: Duration,
    pub secure_cookie: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityConfig {
    pub access_policy: AccessPolicyKind,
}

/// Where the configuration came from, for startup logging.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_pepper: DEFAULT_PASSWORD_PEPPER.to_string(),
            argon2: Argon2Settings::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            ttl: DEFAULT_SESSION_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            secure_cookie: false,
        }
    }
}

impl Config {
    /// Defaults with the cheapest Argon2 parameters, for tests.
    pub fn for_tests() -> Self {
        let mut config = Self::default();
        config.auth.argon2 = Argon2Settings::minimal();
        config.dev_mode = true;
        config
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn uses_default_pepper(&self) -> bool {
        self.auth.password_pepper == DEFAULT_PASSWORD_PEPPER
    }
}
