use std::net::{Ipv4Addr, SocketAddr};
use thiserror::Error;

const DEFAULT_HOST: Ipv4Addr = Ipv4Addr::UNSPECIFIED;
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("HOST is not a valid IPv4 address: {0:?}")]
    InvalidHost(String),

    #[error("PORT is not a valid port number: {0:?}")]
    InvalidPort(String),
}

/// Whether persistence settings appear in the environment.
///
/// Only reported by the diagnostic endpoint; the values themselves are never
/// kept.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PersistenceEnv {
    pub database_url: bool,
    pub database_name: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: Ipv4Addr,
    pub port: u16,
    pub persistence: PersistenceEnv,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host: Ipv4Addr = match lookup("HOST") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidHost(raw))?,
            None => DEFAULT_HOST,
        };

        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let is_set = |key: &str| lookup(key).is_some_and(|v| !v.is_empty());
        let persistence = PersistenceEnv {
            database_url: is_set("DATABASE_URL"),
            database_name: is_set("DATABASE_NAME"),
        };

        Ok(Config {
            host,
            port,
            persistence,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}
