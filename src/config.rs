use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};

const DEFAULT_ADDRESS: ([u8; 4], u16) = ([127, 0, 0, 1], 3001);
const DEFAULT_ENDPOINTS_PATH: &str = "endpoints.json";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Runtime settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub address: SocketAddr,
    pub endpoints_path: PathBuf,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let address = match lookup("ADDRESS") {
            Some(address) => address
                .parse()
                .with_context(|| format!("ADDRESS '{address}' is not a socket address"))?,
            None => SocketAddr::from(DEFAULT_ADDRESS),
        };
        let endpoints_path = lookup("ENDPOINTS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ENDPOINTS_PATH));
        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS '{value}' is not a number"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        Ok(Config {
            database_url,
            address,
            endpoints_path,
            max_connections,
        })
    }
}
