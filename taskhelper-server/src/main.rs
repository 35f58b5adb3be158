use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use taskhelper_core::auth::AuthCrypto;
use taskhelper_server::{
    AppState, create_app,
    infra::{
        config::{CliOverrides, Config, ConfigLoad, ConfigLoader, ConfigWarnings},
        startup::{ProdStartupHooks, StartupHooks},
    },
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "taskhelper-server")]
#[command(about = "TaskHelper web server with form login and in-memory sessions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Path to a TOML configuration file
    #[arg(long, env = "TASKHELPER_CONFIG")]
    config: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print an Argon2id hash of PASSWORD using the configured pepper
    HashPassword {
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::HashPassword { password }) = cli.command {
        let ConfigLoad { config, .. } = load_config(&cli.serve)?;
        println!("{}", hash_password(&config, &password)?);
        return Ok(());
    }

    run_server(cli.serve, &ProdStartupHooks).await
}

/// Argon2id PHC string for `password` under the configured pepper and cost.
fn hash_password(config: &Config, password: &str) -> anyhow::Result<String> {
    let crypto =
        AuthCrypto::with_settings(config.auth.password_pepper.as_bytes(), config.auth.argon2)
            .context("failed to initialize authentication crypto helpers")?;
    crypto
        .hash_password(password)
        .context("failed to hash password")
}

fn load_config(args: &ServeArgs) -> anyhow::Result<ConfigLoad> {
    let mut loader = ConfigLoader::new().with_overrides(CliOverrides {
        host: args.host.clone(),
        port: args.port,
    });
    if let Some(path) = args.config.as_ref() {
        loader = loader.with_config_path(path);
    }
    loader.load().context("failed to load configuration")
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn log_startup_config(config: &Config, warnings: &ConfigWarnings) {
    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = config.metadata.config_path.as_ref() {
        info!(path = %path.display(), "configuration file loaded");
    }

    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }
}

async fn run_server<H>(args: ServeArgs, hooks: &H) -> anyhow::Result<()>
where
    H: StartupHooks,
{
    let ConfigLoad { config, warnings } = load_config(&args)?;
    init_tracing();
    log_startup_config(&config, &warnings);

    let config = Arc::new(config);
    let state = AppState::bootstrap(Arc::clone(&config))?;
    hooks.run(&state).context("startup hooks failed")?;

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    info!("Starting TaskHelper server on {}", listener.local_addr()?);

    let make_service = create_app(state).into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, make_service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhelper_core::auth::Argon2Settings;

    #[test]
    fn hash_password_uses_configured_pepper() {
        let mut config = Config::for_tests();
        config.auth.password_pepper = "cli-pepper".to_string();

        let hash = hash_password(&config, "secret").unwrap();
        assert!(hash.starts_with("$argon2id$"));

        let crypto =
            AuthCrypto::with_settings("cli-pepper", Argon2Settings::minimal()).unwrap();
        assert!(crypto.verify_password("secret", &hash).unwrap());
        assert!(!crypto.verify_password("other", &hash).unwrap());

        let other_pepper =
            AuthCrypto::with_settings("different", Argon2Settings::minimal()).unwrap();
        assert!(!other_pepper.verify_password("secret", &hash).unwrap());
    }

    #[test]
    fn hash_password_subcommand_parses() {
        let cli = Cli::try_parse_from(["taskhelper-server", "hash-password", "secret"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::HashPassword { ref password }) if password == "secret"
        ));
    }
}
