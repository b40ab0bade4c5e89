//! Configuration module
//!
//! Configuration for the API server: listen port, environment, store backend and
//! database pool settings. Values come from the process environment (a `.env` file
//! is loaded first when present).

use std::env;

use crate::store_backend::StoreBackend;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MIN_DEV_API_KEY_LENGTH: usize = 16;

/// Base configuration shared by the server and the CLI
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    /// Seeds a developer user with this key when the memory backend is selected.
    pub dev_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let base = BaseConfig {
            server_port: lookup("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| MAX_CONNECTIONS.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a valid number"))?,
            db_timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_TIMEOUT_SECONDS must be a valid number"))?,
        };

        let store_backend = lookup("STORE_BACKEND")
            .map(|s| s.parse::<StoreBackend>())
            .transpose()?
            .unwrap_or(StoreBackend::Postgres);

        Ok(Config {
            base,
            store_backend,
            database_url: lookup("DATABASE_URL").filter(|s| !s.trim().is_empty()),
            dev_api_key: lookup("DEV_API_KEY").filter(|s| !s.trim().is_empty()),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.store_backend {
            StoreBackend::Postgres => {
                let url = self.database_url.as_deref().unwrap_or_default();
                if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ));
                }
            }
            StoreBackend::Memory => {
                if self.is_production() {
                    return Err(anyhow::anyhow!(
                        "STORE_BACKEND=memory cannot be used in production"
                    ));
                }
            }
        }

        if let Some(key) = &self.dev_api_key {
            if key.len() < MIN_DEV_API_KEY_LENGTH {
                return Err(anyhow::anyhow!(
                    "DEV_API_KEY must be at least {} characters long",
                    MIN_DEV_API_KEY_LENGTH
                ));
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.base.db_timeout_seconds
    }

    pub fn store_backend(&self) -> StoreBackend {
        self.store_backend
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn dev_api_key(&self) -> Option<&str> {
        self.dev_api_key.as_deref()
    }
}
