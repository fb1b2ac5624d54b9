//! Startup configuration from the environment.

use gdelt_scheduler::DEFAULT_WORKERS;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8000";
pub const DEFAULT_RESOURCES: &str = "resources";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub listen: SocketAddr,
    pub workers: usize,
    /// Directory holding the category table files.
    pub resources: PathBuf,
}

impl ApiConfig {
    /// Read `GDELT_LISTEN`, `GDELT_WORKERS` and `GDELT_RESOURCES`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let listen = lookup("GDELT_LISTEN").unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let listen: SocketAddr = listen.parse().map_err(|_| ConfigError::Invalid {
            name: "GDELT_LISTEN",
            value: listen.clone(),
        })?;
        let workers: usize = match lookup("GDELT_WORKERS") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "GDELT_WORKERS",
                value: v.clone(),
            })?,
            None => DEFAULT_WORKERS,
        };
        let resources = lookup("GDELT_RESOURCES").unwrap_or_else(|| DEFAULT_RESOURCES.to_string());
        Ok(Self {
            listen,
            workers,
            resources: PathBuf::from(resources),
        })
    }
}
