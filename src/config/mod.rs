//! Application configuration management

use std::env;

use anyhow::{Context, Result};

use crate::services::events::DEFAULT_CAPACITY;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// SQLite connection URL, e.g. `sqlite://./data/catalog.db`
    pub database_url: String,

    /// Maximum pooled database connections
    pub database_max_connections: u32,

    /// Secret used to sign and verify bearer tokens
    pub jwt_secret: String,

    /// Bcrypt cost factor for password hashes
    pub bcrypt_cost: u32,

    /// Events buffered per `bookAdded` subscriber
    pub event_bus_capacity: usize,

    /// Insert the sample catalog when the database is empty
    pub seed_sample_data: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup; unset keys take defaults.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = var("JWT_SECRET")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .context("JWT_SECRET is required")?;

        Ok(Self {
            port: var("PORT")
                .unwrap_or_else(|| "4000".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url: var("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://./data/catalog.db".to_string()),

            database_max_connections: var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,

            jwt_secret,

            bcrypt_cost: match var("BCRYPT_COST") {
                Some(v) => v.parse().context("Invalid BCRYPT_COST")?,
                None => bcrypt::DEFAULT_COST,
            },

            event_bus_capacity: match var("EVENT_BUS_CAPACITY") {
                Some(v) => v.parse().context("Invalid EVENT_BUS_CAPACITY")?,
                None => DEFAULT_CAPACITY,
            },

            seed_sample_data: var("SEED_SAMPLE_DATA")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }
}
