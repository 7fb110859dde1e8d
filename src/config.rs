//! Runtime configuration resolved from the environment (and an optional
//! `.env` file loaded by the binary before calling [`Config::from_env`]).

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::db::default_db_path;
use crate::query::DEFAULT_MAX_LIMIT;

pub const ENV_DB_PATH: &str = "SONG_CATALOG_DB";
pub const ENV_BIND_ADDR: &str = "SONG_CATALOG_ADDR";
pub const ENV_MAX_LIMIT: &str = "SONG_CATALOG_MAX_LIMIT";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var} must be a non-negative integer, got {value}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("could not resolve the default database path: {0:#}")]
    DataDir(#[source] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub bind_addr: SocketAddr,
    /// Ceiling on search `limit`; zero disables it.
    pub max_limit: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary lookup so tests do not need
    /// to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_path = match present(ENV_DB_PATH) {
            Some(path) => PathBuf::from(path),
            None => default_db_path().map_err(ConfigError::DataDir)?,
        };

        let raw_addr = present(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidAddr {
                var: ENV_BIND_ADDR,
                value: raw_addr.clone(),
            })?;

        let max_limit = match present(ENV_MAX_LIMIT) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: ENV_MAX_LIMIT,
                    value: raw.clone(),
                })?,
            None => DEFAULT_MAX_LIMIT,
        };

        Ok(Self {
            database_path,
            bind_addr,
            max_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn explicit_values_win() {
        let config = Config::from_lookup(lookup(&[
            (ENV_DB_PATH, "/tmp/songs.sqlite"),
            (ENV_BIND_ADDR, "0.0.0.0:9000"),
            (ENV_MAX_LIMIT, "250"),
        ]))
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/songs.sqlite"));
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.max_limit, 250);
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[(ENV_DB_PATH, "songs.sqlite")])).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(config.max_limit, DEFAULT_MAX_LIMIT);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = Config::from_lookup(lookup(&[
            (ENV_DB_PATH, "songs.sqlite"),
            (ENV_BIND_ADDR, "localhost"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddr { .. }));

        let err = Config::from_lookup(lookup(&[
            (ENV_DB_PATH, "songs.sqlite"),
            (ENV_MAX_LIMIT, "-4"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
    }
}
