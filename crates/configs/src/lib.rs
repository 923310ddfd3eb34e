use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::{info, warn};

/// Signing secret used when neither the config file nor `ACCESS_TOKEN_SECRET` provides one.
pub const DEV_TOKEN_SECRET: &str = "dev-secret-change-me";

/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 5000, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

/// Token signing settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub token_secret: String,
    /// Token lifetime in seconds; `0` issues tokens without an `exp` claim.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { token_secret: String::new(), token_ttl_secs: default_token_ttl() }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_token_ttl() -> u64 { 3600 }

/// Path of the config file: `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content)
}

/// Read the config file at `path`; `None` only when the file does not exist.
pub fn read_config_file(path: &str) -> Result<Option<AppConfig>> {
    match load_from_file(path) {
        Ok(cfg) => Ok(Some(cfg)),
        Err(e) => match e.downcast_ref::<std::io::Error>() {
            Some(io) if io.kind() == std::io::ErrorKind::NotFound => Ok(None),
            _ => Err(e.context(format!("failed to load config file {path}"))),
        },
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse an environment value, naming the variable when it is malformed.
fn parse_var<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| anyhow!("{key}={raw:?} is invalid: {e}"))
}

pub fn from_toml_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

/// Build a postgres URL from the discrete credentials the deployment provides.
pub fn compose_database_url(user: &str, password: &str, host: &str, name: &str) -> String {
    format!("postgres://{}:{}@{}/{}", user, password, host, name)
}

impl AppConfig {
    /// Build a configuration purely from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env_var)
    }

    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = AppConfig::default();
        if let Some(host) = get("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = get("PORT") {
            cfg.server.port = parse_var("PORT", &port)?;
        }
        Ok(cfg)
    }

    /// Config file when present, environment otherwise; always normalized and validated.
    ///
    /// A config file that exists but cannot be read or parsed is an error.
    pub fn load() -> Result<Self> {
        let path = config_path();
        let mut cfg = match read_config_file(&path)? {
            Some(cfg) => cfg,
            None => {
                info!(%path, "no config file; configuring from environment");
                Self::from_env()?
            }
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.auth.normalize_with(env_var)?;
        self.auth.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Fill an empty URL from `DATABASE_URL`, or from `DB_USER`/`DB_PASSWORD`.
    pub fn normalize_from_env(&mut self) {
        if !self.url.trim().is_empty() {
            return;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.url = url;
            return;
        }
        if let (Ok(user), Ok(password)) = (std::env::var("DB_USER"), std::env::var("DB_PASSWORD")) {
            let host = std::env::var("DB_HOST").unwrap_or_else(|_| "localhost:5432".to_string());
            let name = std::env::var("DB_NAME").unwrap_or_else(|_| "creativeAgency".to_string());
            self.url = compose_database_url(&user, &password, &host, &name);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml, DATABASE_URL, or DB_USER/DB_PASSWORD"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    fn normalize_with(&mut self, get: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(ttl) = get("ACCESS_TOKEN_TTL_SECS") {
            self.token_ttl_secs = parse_var("ACCESS_TOKEN_TTL_SECS", &ttl)?;
        }
        if !self.token_secret.trim().is_empty() {
            return Ok(());
        }
        match get("ACCESS_TOKEN_SECRET") {
            Some(secret) if !secret.trim().is_empty() => self.token_secret = secret,
            _ => {
                warn!("ACCESS_TOKEN_SECRET not set; using development signing secret");
                self.token_secret = DEV_TOKEN_SECRET.to_string();
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(anyhow!(
                "auth.token_ttl_secs must be at most {MAX_TOKEN_TTL_SECS} (0 disables expiry)"
            ));
        }
        Ok(())
    }

    pub fn token_ttl(&self) -> Option<Duration> {
        match self.token_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
