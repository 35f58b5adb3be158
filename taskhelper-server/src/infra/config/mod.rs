pub mod loader;
pub mod models;
pub mod sources;

pub use loader::{
    CliOverrides, ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions,
    ConfigWarning, ConfigWarnings,
};
pub use models::{
    AuthConfig, Config, ConfigMetadata, SecurityConfig, ServerConfig, SessionConfig,
};
