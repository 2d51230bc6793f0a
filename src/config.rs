use std::env;
use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub log_filter: String,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://scheduler.db?mode=rwc".to_string());
        let bind_addr = parse_var("BIND_ADDR", "127.0.0.1:5000")?;
        let max_connections = parse_var("DATABASE_MAX_CONNECTIONS", "5")?;
        let log_filter = env::var("RUST_LOG")
            .unwrap_or_else(|_| "academic_scheduler=debug".to_string());

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            log_filter,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = env::var(name).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|_| ConfigError::Invalid { name, value })
}
