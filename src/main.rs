//! Etherdoc gateway binary.
//!
//! ```text
//! etherdoc [--env dev|prod] [--port N]
//! ```
//!
//! Non-secret settings come from `config/<env>.yaml`. `ADDRESS_ADMIN`,
//! `JWT_SECRET` and `PINATA_JWT_TOKEN` must be set in the environment.

use std::sync::Arc;

use anyhow::Context;
use etherdoc::{AppConfig, AppState, AuthService, DocumentService, Secrets};

/// Command line options. Unknown flags are ignored.
#[derive(Debug, PartialEq, Eq)]
struct CliArgs {
    env: String,
    port: Option<u16>,
}

impl CliArgs {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut parsed = Self {
            env: "dev".to_string(),
            port: None,
        };
        let mut args = args.into_iter().skip(1);
        while let Some(flag) = args.next() {
            match flag.as_str() {
                "--env" | "-e" => {
                    parsed.env = args.next().context("--env needs a value")?;
                }
                "--port" | "-p" => {
                    let raw = args.next().context("--port needs a value")?;
                    parsed.port = Some(
                        raw.parse::<u16>()
                            .with_context(|| format!("invalid --port value '{}'", raw))?,
                    );
                }
                _ => {}
            }
        }
        Ok(parsed)
    }
}

/// Parse the command line and load the matching config file.
fn load_config() -> anyhow::Result<(String, AppConfig)> {
    let args = CliArgs::parse(std::env::args())?;
    let mut config = AppConfig::load(&args.env)?;
    if let Some(port) = args.port {
        config.gateway.port = port;
    }
    Ok((args.env, config))
}

fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let secrets = Secrets::from_env()?;
    let auth = AuthService::from_config(&secrets, &config.auth)
        .context("Failed to initialize admin authentication")?;
    let documents = DocumentService::from_config(config, &secrets)
        .context("Failed to initialize document collaborators")?;

    tracing::info!(
        "Administrator: {}, nonce TTL {}s, token lifetime {}s",
        auth.admin().as_str(),
        config.auth.nonce_ttl_secs,
        config.auth.token_lifetime_secs
    );
    Ok(AppState::new(auth, documents, config.auth.clone()))
}

#[tokio::main]
async fn main() {
    let (env, app_config) = match load_config() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("FATAL: {:#}", e);
            std::process::exit(1);
        }
    };

    let _log_guard = etherdoc::logging::init_logging(&app_config);
    tracing::info!(
        "Starting etherdoc {} in {} mode",
        env!("GIT_HASH"),
        env
    );

    let state = match build_state(&app_config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!("FATAL: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = etherdoc::run_server(&app_config.gateway, state).await {
        tracing::error!("FATAL: Server error: {}", e);
        std::process::exit(1);
    }
}
