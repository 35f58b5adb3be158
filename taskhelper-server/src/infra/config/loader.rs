use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};
use taskhelper_core::auth::{AccessPolicyKind, Argon2Settings};
use thiserror::Error;

use super::{
    models::{
        AuthConfig, Config, ConfigMetadata, DEFAULT_HOST, DEFAULT_PASSWORD_PEPPER, DEFAULT_PORT,
        MAX_SWEEP_INTERVAL, SecurityConfig, ServerConfig, SessionConfig,
    },
    sources::{EnvConfig, FileConfig, parse_bool},
};

const DEFAULT_CONFIG_LOCATIONS: [&str; 2] = ["taskhelper.toml", "config/taskhelper.toml"];

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("config file {path} does not exist")]
    MissingConfig { path: PathBuf },
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to load .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// A non-fatal configuration finding, logged at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push(&mut self, message: impl Into<String>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint(&mut self, message: impl Into<String>, hint: impl Into<String>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

/// Command-line values; these win over every other source.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    pub overrides: CliOverrides,
}

/// Resolves [`Config`] from CLI overrides, environment, an optional TOML
/// file and defaults, in that order of precedence.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_overrides(mut self, overrides: CliOverrides) -> Self {
        self.options.overrides = overrides;
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(|err| match err {
                dotenvy::Error::Io(_) => Ok(false),
                _ => Err(err),
            })?,
            None => dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                dotenvy::Error::Io(_) => Ok(false),
                _ => Err(err),
            })?,
        };

        self.load_from_env(EnvConfig::gather(), env_file_loaded)
    }

    /// Same as [`ConfigLoader::load`] but with an explicit environment
    /// snapshot and without touching `.env`.
    pub fn load_from_env(
        &self,
        env: EnvConfig,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        self.compose_config(file_config, env, config_path, env_file_loaded)
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env.config_path.clone());

        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(path) => path,
                None => return Ok((None, None)),
            },
        };

        let file_config = read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }

    fn compose_config(
        &self,
        file_config: Option<FileConfig>,
        env: EnvConfig,
        config_path: Option<PathBuf>,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        if file_config.is_none() {
            warnings.push_with_hint(
                "No taskhelper.toml detected; using environment variables and defaults",
                "Set TASKHELPER_CONFIG or pass --config to point at a configuration file",
            );
        }

        let FileConfig {
            server: file_server,
            auth: file_auth,
            session: file_session,
            security: file_security,
            dev_mode: file_dev_mode,
        } = file_config.unwrap_or_default();
        let overrides = &self.options.overrides;

        let port = match overrides.port {
            Some(port) => port,
            None => parse_opt("SERVER_PORT", env.server_port.as_deref(), |raw| {
                raw.parse::<u16>().map_err(|err| err.to_string())
            })?
            .or(file_server.port)
            .unwrap_or(DEFAULT_PORT),
        };

        let server = ServerConfig {
            host: overrides
                .host
                .clone()
                .or(env.server_host)
                .or(file_server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        };

        let defaults = Argon2Settings::default();
        let parse_u32 = |raw: &str| raw.parse::<u32>().map_err(|err| err.to_string());
        let argon2 = Argon2Settings {
            memory_kib: parse_opt("ARGON2_MEMORY_KIB", env.argon2_memory_kib.as_deref(), parse_u32)?
                .or(file_auth.argon2.memory_kib)
                .unwrap_or(defaults.memory_kib),
            iterations: parse_opt("ARGON2_ITERATIONS", env.argon2_iterations.as_deref(), parse_u32)?
                .or(file_auth.argon2.iterations)
                .unwrap_or(defaults.iterations),
            parallelism: parse_opt(
                "ARGON2_PARALLELISM",
                env.argon2_parallelism.as_deref(),
                parse_u32,
            )?
            .or(file_auth.argon2.parallelism)
            .unwrap_or(defaults.parallelism),
        };

        let auth = AuthConfig {
            password_pepper: env
                .password_pepper
                .or(file_auth.password_pepper)
                .unwrap_or_else(|| DEFAULT_PASSWORD_PEPPER.to_string()),
            argon2,
        };

        let session_defaults = SessionConfig::default();
        let session = SessionConfig {
            cookie_name: env
                .session_cookie_name
                .or(file_session.cookie_name)
                .unwrap_or(session_defaults.cookie_name),
            ttl: pick_duration(
                ("SESSION_TTL", env.session_ttl),
                ("session.ttl", file_session.ttl),
            )?
            .unwrap_or(session_defaults.ttl),
            sweep_interval: pick_duration(
                ("SESSION_SWEEP_INTERVAL", env.session_sweep_interval),
                ("session.sweep_interval", file_session.sweep_interval),
            )?
            .unwrap_or(session_defaults.sweep_interval),
            secure_cookie: parse_opt(
                "SESSION_SECURE_COOKIE",
                env.session_secure_cookie.as_deref(),
                parse_bool_value,
            )?
            .or(file_session.secure_cookie)
            .unwrap_or(session_defaults.secure_cookie),
        };
        validate_session(&session)?;

        let access_policy = match env.access_policy {
            Some(raw) => Some(parse_policy("ACCESS_POLICY", &raw)?),
            None => match file_security.access_policy {
                Some(raw) => Some(parse_policy("security.access_policy", &raw)?),
                None => None,
            },
        }
        .unwrap_or_default();

        let dev_mode = parse_opt("DEV_MODE", env.dev_mode.as_deref(), parse_bool_value)?
            .or(file_dev_mode)
            .unwrap_or(false);

        let config = Config {
            server,
            auth,
            session,
            security: SecurityConfig { access_policy },
            dev_mode,
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        };

        if config.uses_default_pepper() && !config.dev_mode {
            warnings.push_with_hint(
                "Using the built-in password pepper",
                "Set AUTH_PASSWORD_PEPPER (or auth.password_pepper) to a random secret",
            );
        }
        if !config.session.secure_cookie && !config.dev_mode {
            warnings.push("Session cookie is sent without the Secure attribute");
        }

        Ok(ConfigLoad { config, warnings })
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents = fs::read_to_string(path).map_err(|err| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source: err,
    })?;
    toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source: err,
    })
}

fn parse_opt<T>(
    key: &'static str,
    raw: Option<&str>,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Result<Option<T>, ConfigLoadError> {
    raw.map(|value| {
        parse(value).map_err(|reason| ConfigLoadError::InvalidValue {
            key,
            value: value.to_string(),
            reason,
        })
    })
    .transpose()
}

fn parse_bool_value(raw: &str) -> Result<bool, String> {
    parse_bool(raw).ok_or_else(|| "expected a boolean".to_string())
}

fn parse_duration(raw: &str) -> Result<Duration, String> {
    humantime::parse_duration(raw).map_err(|err| err.to_string())
}

fn pick_duration(
    (env_key, env_value): (&'static str, Option<String>),
    (file_key, file_value): (&'static str, Option<String>),
) -> Result<Option<Duration>, ConfigLoadError> {
    match (env_value, file_value) {
        (Some(raw), _) => parse_opt(env_key, Some(&raw), parse_duration),
        (None, Some(raw)) => parse_opt(file_key, Some(&raw), parse_duration),
        (None, None) => Ok(None),
    }
}

fn parse_policy(key: &'static str, raw: &str) -> Result<AccessPolicyKind, ConfigLoadError> {
    AccessPolicyKind::from_str(raw).map_err(|err| ConfigLoadError::InvalidValue {
        key,
        value: raw.to_string(),
        reason: err.to_string(),
    })
}

fn validate_session(session: &SessionConfig) -> Result<(), ConfigLoadError> {
    let valid_name = !session.cookie_name.is_empty()
        && session
            .cookie_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !valid_name {
        return Err(ConfigLoadError::InvalidValue {
            key: "session.cookie_name",
            value: session.cookie_name.clone(),
            reason: "cookie names are limited to ASCII letters, digits, '_', '-' and '.'"
                .to_string(),
        });
    }
    if session.ttl.is_zero() {
        return Err(ConfigLoadError::InvalidValue {
            key: "session.ttl",
            value: "0s".to_string(),
            reason: "session lifetime must be positive".to_string(),
        });
    }
    if session.sweep_interval.is_zero() || session.sweep_interval > MAX_SWEEP_INTERVAL {
        return Err(ConfigLoadError::InvalidValue {
            key: "session.sweep_interval",
            value: humantime::format_duration(session.sweep_interval).to_string(),
            reason: format!(
                "sweep interval must be positive and at most {}",
                humantime::format_duration(MAX_SWEEP_INTERVAL)
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_apply_without_any_source() {
        let loader = ConfigLoader::new();
        let ConfigLoad { config, warnings } = loader
            .compose_config(None, EnvConfig::default(), None, false)
            .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.cookie_name, "SESSIONID");
        assert_eq!(config.session.ttl, Duration::from_secs(1800));
        assert_eq!(config.security.access_policy, AccessPolicyKind::PermitAll);
        assert!(config.uses_default_pepper());
        assert!(!warnings.is_empty());
    }

    #[test]
    fn precedence_is_cli_then_env_then_file() {
        let file = write_config(
            r#"
            [server]
            host = "10.0.0.1"
            port = 7000

            [session]
            ttl = "2h"
            "#,
        );
        let env = EnvConfig {
            server_port: Some("7100".to_string()),
            session_ttl: Some("15m".to_string()),
            ..EnvConfig::default()
        };

        let loader = ConfigLoader::new()
            .with_config_path(file.path())
            .with_overrides(CliOverrides {
                host: None,
                port: Some(7200),
            });
        let ConfigLoad { config, .. } = loader.load_from_env(env, false).unwrap();

        assert_eq!(config.server.port, 7200);
        assert_eq!(config.server.host, "10.0.0.1");
        assert_eq!(config.session.ttl, Duration::from_secs(15 * 60));
        assert_eq!(config.metadata.config_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn file_values_fill_in_when_env_is_silent() {
        let file = write_config(
            r#"
            dev_mode = true

            [auth]
            password_pepper = "from-file"

            [auth.argon2]
            memory_kib = 8
            iterations = 1

            [session]
            cookie_name = "TH_SESSION"
            secure_cookie = true

            [security]
            access_policy = "role-based"
            "#,
        );
        let ConfigLoad { config, warnings } = ConfigLoader::new()
            .with_config_path(file.path())
            .load_from_env(EnvConfig::default(), false)
            .unwrap();

        assert!(config.dev_mode);
        assert_eq!(config.auth.password_pepper, "from-file");
        assert_eq!(config.auth.argon2.memory_kib, 8);
        assert_eq!(config.auth.argon2.iterations, 1);
        assert_eq!(config.auth.argon2.parallelism, 1);
        assert_eq!(config.session.cookie_name, "TH_SESSION");
        assert!(config.session.secure_cookie);
        assert_eq!(config.security.access_policy, AccessPolicyKind::RoleBased);
        assert!(warnings.is_empty());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = ConfigLoader::new()
            .with_config_path("/definitely/not/here/taskhelper.toml")
            .load_from_env(EnvConfig::default(), false)
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let file = write_config("[server\nport = 1");
        let err = ConfigLoader::new()
            .with_config_path(file.path())
            .load_from_env(EnvConfig::default(), false)
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse { .. }));
    }

    #[test]
    fn invalid_env_values_name_their_key() {
        let loader = ConfigLoader::new();
        let cases = [
            EnvConfig {
                server_port: Some("eighty".to_string()),
                ..EnvConfig::default()
            },
            EnvConfig {
                session_ttl: Some("soon".to_string()),
                ..EnvConfig::default()
            },
            EnvConfig {
                access_policy: Some("deny-all".to_string()),
                ..EnvConfig::default()
            },
            EnvConfig {
                session_cookie_name: Some("bad name;".to_string()),
                ..EnvConfig::default()
            },
        ];
        let expected = ["SERVER_PORT", "SESSION_TTL", "ACCESS_POLICY", "session.cookie_name"];

        for (env, key) in cases.into_iter().zip(expected) {
            match loader.compose_config(None, env, None, false) {
                Err(ConfigLoadError::InvalidValue { key: got, .. }) => assert_eq!(got, key),
                other => panic!("expected InvalidValue for {key}, got {other:?}"),
            }
        }
    }

    #[test]
    fn oversized_sweep_interval_is_rejected() {
        let env = EnvConfig {
            session_sweep_interval: Some("300000000000y".to_string()),
            ..EnvConfig::default()
        };
        assert!(matches!(
            ConfigLoader::new().compose_config(None, env, None, false),
            Err(ConfigLoadError::InvalidValue { key: "session.sweep_interval", .. })
        ));

        let env = EnvConfig {
            session_sweep_interval: Some("1day".to_string()),
            ..EnvConfig::default()
        };
        let ConfigLoad { config, .. } = ConfigLoader::new()
            .compose_config(None, env, None, false)
            .unwrap();
        assert_eq!(config.session.sweep_interval, MAX_SWEEP_INTERVAL);
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let env = EnvConfig {
            session_ttl: Some("0s".to_string()),
            ..EnvConfig::default()
        };
        assert!(matches!(
            ConfigLoader::new().compose_config(None, env, None, false),
            Err(ConfigLoadError::InvalidValue { key: "session.ttl", .. })
        ));
    }
}
