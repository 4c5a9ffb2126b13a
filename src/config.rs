use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;
use thiserror::Error;

/// Configuration failures. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// Separate file for per-request access lines, under `log_dir`
    #[serde(default)]
    pub access_log_file: Option<String>,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub auth: AuthSettings,
    pub pinning: PinningConfig,
    pub chains: ChainsConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for every outbound call (pinning provider, RPC nodes)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

/// Non-secret authentication settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthSettings {
    pub nonce_ttl_secs: u64,
    pub token_lifetime_secs: u64,
    pub cookie_name: String,
    pub session_cookie_name: String,
    /// Upper bound on sessions holding an unused nonce
    #[serde(default = "default_max_pending_nonces")]
    pub max_pending_nonces: usize,
    /// How often expired nonces are swept
    #[serde(default = "default_nonce_sweep_secs")]
    pub nonce_sweep_secs: u64,
}

fn default_max_pending_nonces() -> usize {
    10_000
}

fn default_nonce_sweep_secs() -> u64 {
    30
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            nonce_ttl_secs: 100,
            token_lifetime_secs: 3600,
            cookie_name: "etherdoc-auth".to_string(),
            session_cookie_name: "etherdoc-session".to_string(),
            max_pending_nonces: default_max_pending_nonces(),
            nonce_sweep_secs: default_nonce_sweep_secs(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PinningConfig {
    pub api_url: String,
}

/// The authoritative chain gates document retrieval, the mirror is informative.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChainsConfig {
    pub ethereum: ChainConfig,
    pub base: ChainConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChainConfig {
    pub name: String,
    pub rpc_url: String,
    pub contract_address: String,
}

/// Values that only ever come from the environment.
#[derive(Clone)]
pub struct Secrets {
    pub admin_address: String,
    pub jwt_secret: String,
    pub pinning_jwt: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("admin_address", &self.admin_address)
            .field("jwt_secret", &"<redacted>")
            .field("pinning_jwt", &"<redacted>")
            .finish()
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        let mut config = Self::from_yaml(&content)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the service unusable, wherever they came from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("auth.nonce_ttl_secs", self.auth.nonce_ttl_secs),
            ("auth.token_lifetime_secs", self.auth.token_lifetime_secs),
            ("auth.max_pending_nonces", self.auth.max_pending_nonces as u64),
            ("auth.nonce_sweep_secs", self.auth.nonce_sweep_secs),
            ("gateway.request_timeout_ms", self.gateway.request_timeout_ms),
        ];
        match positive.iter().find(|(_, value)| *value == 0) {
            Some((key, _)) => Err(ConfigError::Invalid {
                key: *key,
                reason: "must be greater than zero".to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Deployment-specific endpoints and timings may be overridden from the environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PINATA_API_URL") {
            self.pinning.api_url = url;
        }
        if let Some(url) = lookup("HOLESKY_RPC_URL") {
            self.chains.ethereum.rpc_url = url;
        }
        if let Some(url) = lookup("BASE_SEPOLIA_RPC_URL") {
            self.chains.base.rpc_url = url;
        }
        if let Some(raw) = lookup("NONCE_TTL_SECS") {
            self.auth.nonce_ttl_secs = parse_secs("NONCE_TTL_SECS", &raw)?;
        }
        if let Some(raw) = lookup("JWT_EXPIRES_IN_SECS") {
            self.auth.token_lifetime_secs = parse_secs("JWT_EXPIRES_IN_SECS", &raw)?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.gateway.request_timeout_ms)
    }
}

impl AuthSettings {
    pub fn nonce_ttl(&self) -> Duration {
        Duration::from_secs(self.nonce_ttl_secs)
    }

    pub fn token_lifetime(&self) -> Duration {
        Duration::from_secs(self.token_lifetime_secs)
    }

    pub fn nonce_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.nonce_sweep_secs)
    }
}

impl Secrets {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingEnv(key))
        };

        Ok(Self {
            admin_address: required("ADDRESS_ADMIN")?,
            jwt_secret: required("JWT_SECRET")?,
            pinning_jwt: required("PINATA_JWT_TOKEN")?,
        })
    }
}

fn parse_secs(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            key,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(v) => Ok(v),
        Err(e) => Err(ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
    }
}
