use std::io;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_FILE: &str = "customers.json";
pub const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

/// Where customer data lives and which directory is served as the web interface.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_file")]
    pub data_file: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_file: default_data_file(), static_dir: default_static_dir() }
    }
}

fn default_host() -> String { DEFAULT_HOST.to_string() }
fn default_port() -> u16 { DEFAULT_PORT }
fn default_data_file() -> String { DEFAULT_DATA_FILE.to_string() }
fn default_static_dir() -> String { DEFAULT_STATIC_DIR.to_string() }

/// `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>().is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file first (`CONFIG_PATH`, default `config.toml`); only when it
    /// does not exist fall back to `SERVER_HOST`, `SERVER_PORT`,
    /// `TOKIO_WORKER_THREADS`, `DATA_FILE` and `STATIC_DIR`.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path())
    }

    /// A file that exists but cannot be read, parsed or validated is an error.
    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = match load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => Self::from_env(),
            Err(e) => return Err(e.context(format!("config file {path}"))),
        };
        cfg.normalize_and_validate().with_context(|| format!("validate {path}"))?;
        Ok(cfg)
    }

    pub fn from_env() -> Self {
        let env = |key: &str| std::env::var(key).ok();
        let server = ServerConfig {
            host: env("SERVER_HOST").unwrap_or_else(default_host),
            port: env("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()).unwrap_or(DEFAULT_PORT),
            worker_threads: env("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()),
        };
        let storage = StorageConfig {
            data_file: env("DATA_FILE").unwrap_or_else(default_data_file),
            static_dir: env("STATIC_DIR").unwrap_or_else(default_static_dir),
        };
        Self { server, storage }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.data_file.trim().is_empty() {
            return Err(anyhow!("storage.data_file must not be empty"));
        }
        if self.data_file.ends_with('/') {
            return Err(anyhow!("storage.data_file must point to a file, not a directory"));
        }
        Ok(())
    }
}
