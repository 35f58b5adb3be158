use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
    #[serde(default)]
    pub session: FileSessionConfig,
    #[serde(default)]
    pub security: FileSecurityConfig,
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_pepper: Option<String>,
    #[serde(default)]
    pub argon2: FileArgon2Config,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileArgon2Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_kib: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<u32>,
}

/// Durations are humantime strings such as `"30m"` or `"1h 15m"`.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileSessionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sweep_interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_cookie: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileSecurityConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_policy: Option<String>,
}

/// Environment-derived configuration values. Values that need validation
/// stay raw here and are parsed by the loader so errors name their source.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<String>,
    pub password_pepper: Option<String>,
    pub argon2_memory_kib: Option<String>,
    pub argon2_iterations: Option<String>,
    pub argon2_parallelism: Option<String>,
    pub session_cookie_name: Option<String>,
    pub session_ttl: Option<String>,
    pub session_sweep_interval: Option<String>,
    pub session_secure_cookie: Option<String>,
    pub access_policy: Option<String>,
    pub dev_mode: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            config_path: non_empty_var("TASKHELPER_CONFIG").map(PathBuf::from),
            server_host: non_empty_var("SERVER_HOST"),
            server_port: non_empty_var("SERVER_PORT"),
            password_pepper: non_empty_var("AUTH_PASSWORD_PEPPER"),
            argon2_memory_kib: non_empty_var("ARGON2_MEMORY_KIB"),
            argon2_iterations: non_empty_var("ARGON2_ITERATIONS"),
            argon2_parallelism: non_empty_var("ARGON2_PARALLELISM"),
            session_cookie_name: non_empty_var("SESSION_COOKIE_NAME"),
            session_ttl: non_empty_var("SESSION_TTL"),
            session_sweep_interval: non_empty_var("SESSION_SWEEP_INTERVAL"),
            session_secure_cookie: non_empty_var("SESSION_SECURE_COOKIE"),
            access_policy: non_empty_var("ACCESS_POLICY"),
            dev_mode: non_empty_var("DEV_MODE"),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse a boolean value from a raw string, accepting common env-style forms.
///
/// Accepted truthy values (case-insensitive): `"1"`, `"true"`, `"yes"`, `"on"`.
/// Accepted falsy values: `"0"`, `"false"`, `"no"`, `"off"`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
