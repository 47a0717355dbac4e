//! Server configuration loaded from the environment (.env supported)

use anyhow::Context;
use std::path::PathBuf;

use crate::managers::token_service::DEFAULT_TTL_SECS;

pub const DATABASE_FILE: &str = "enrollment_db.json";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port
    pub port: u16,
    /// Directory holding the database file
    pub data_path: PathBuf,
    /// Skip persistence entirely
    pub in_memory: bool,
    /// HMAC key for session tokens
    pub token_secret: String,
    /// Session token lifetime in seconds
    pub token_ttl_secs: i64,
}

impl ServerConfig {
    /// Create config from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let token_secret = std::env::var("ACCESS_TOKEN_SECRET")
            .context("Missing ACCESS_TOKEN_SECRET environment variable")?;

        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5000),
            data_path: std::env::var("DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("state")),
            in_memory: false,
            token_secret,
            token_ttl_secs: std::env::var("TOKEN_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TTL_SECS),
        })
    }

    pub fn database_file(&self) -> PathBuf {
        self.data_path.join(DATABASE_FILE)
    }
}
