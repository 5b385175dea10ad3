//! Runtime settings
//!
//! Settings come from built-in defaults, then an optional TOML file, then
//! `DEVTRACK_*` environment variables. They are built once at start-up and
//! handed to the rest of the application.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_CONFIG: &str = "DEVTRACK_CONFIG";
pub const ENV_DATA_DIR: &str = "DEVTRACK_DATA_DIR";
pub const ENV_DATABASE_NAME: &str = "DEVTRACK_DATABASE_NAME";
pub const ENV_SECRET_KEY: &str = "DEVTRACK_SECRET_KEY";
pub const ENV_TOKEN_TTL_MINUTES: &str = "DEVTRACK_TOKEN_TTL_MINUTES";
pub const ENV_ALLOWED_ORIGINS: &str = "DEVTRACK_ALLOWED_ORIGINS";
pub const ENV_BIND_ADDR: &str = "DEVTRACK_BIND_ADDR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding every database
    pub data_dir: PathBuf,
    /// Name of the database directory under `data_dir`
    pub database_name: String,
    /// HMAC key for access tokens. Generated per process when empty.
    pub secret_key: String,
    /// Access token lifetime
    pub token_ttl_minutes: i64,
    /// Origins allowed by CORS
    pub allowed_origins: Vec<String>,
    pub bind_addr: SocketAddr,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database_name: "personal_dev_tracker".to_string(),
            secret_key: String::new(),
            token_ttl_minutes: 60 * 24,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("devtrack"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Split a comma separated origin list, dropping blank entries
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Settings {
    /// Load settings from `path` (or `DEVTRACK_CONFIG`) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(ENV_CONFIG).ok().map(PathBuf::from);
        let path = path.map(Path::to_path_buf).or(env_path);

        let mut settings = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        settings.ensure_secret();
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {:?}", path);
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `DEVTRACK_*` overrides read through `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(name) = lookup(ENV_DATABASE_NAME) {
            self.database_name = name;
        }
        if let Some(secret) = lookup(ENV_SECRET_KEY) {
            self.secret_key = secret;
        }
        if let Some(ttl) = lookup(ENV_TOKEN_TTL_MINUTES) {
            self.token_ttl_minutes = ttl
                .trim()
                .parse()
                .ok()
                .filter(|m: &i64| *m > 0)
                .ok_or(ConfigError::InvalidValue {
                    key: ENV_TOKEN_TTL_MINUTES,
                    value: ttl.clone(),
                })?;
        }
        if let Some(origins) = lookup(ENV_ALLOWED_ORIGINS) {
            self.allowed_origins = parse_origins(&origins);
        }
        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            self.bind_addr = addr.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_BIND_ADDR,
                value: addr.clone(),
            })?;
        }
        Ok(())
    }

    fn ensure_secret(&mut self) {
        if self.secret_key.is_empty() {
            log::warn!(
                "No secret key configured; tokens will not survive a restart (set {})",
                ENV_SECRET_KEY
            );
            let mut key = [0u8; 32];
            rand::thread_rng().fill_bytes(&mut key);
            self.secret_key = BASE64.encode(key);
        }
    }

    /// Directory of the active database
    pub fn database_dir(&self) -> PathBuf {
        self.data_dir.join(&self.database_name)
    }
}
