//! Configuration module
//!
//! Loads configuration from environment variables.

use std::collections::HashMap;
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Secret used to sign bearer tokens
    pub auth_secret: String,

    /// Known API clients, `client_id -> client_secret`
    pub auth_clients: HashMap<String, String>,

    /// Bearer token lifetime in minutes
    pub token_expiration_minutes: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let auth_secret =
            env::var("AUTH_SECRET").map_err(|_| ConfigError::MissingEnv("AUTH_SECRET"))?;

        let auth_clients = parse_clients(
            &env::var("AUTH_CLIENTS").map_err(|_| ConfigError::MissingEnv("AUTH_CLIENTS"))?,
        )?;

        let token_expiration_minutes = env::var("TOKEN_EXPIRATION_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("TOKEN_EXPIRATION_MINUTES"))?;

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            auth_secret,
            auth_clients,
            token_expiration_minutes,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Parse `AUTH_CLIENTS` as comma-separated `client_id:client_secret` pairs.
fn parse_clients(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut clients = HashMap::new();

    for pair in raw.split(',').filter(|p| !p.trim().is_empty()) {
        let (id, secret) = pair
            .split_once(':')
            .ok_or(ConfigError::InvalidValue("AUTH_CLIENTS"))?;
        clients.insert(id.trim().to_string(), secret.trim().to_string());
    }

    if clients.is_empty() {
        return Err(ConfigError::InvalidValue("AUTH_CLIENTS"));
    }

    Ok(clients)
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clients() {
        let clients = parse_clients("portal:s3cret, reporting:other").unwrap();
        assert_eq!(clients.get("portal").unwrap(), "s3cret");
        assert_eq!(clients.get("reporting").unwrap(), "other");
    }

    #[test]
    fn test_parse_clients_rejects_bad_pairs() {
        assert!(matches!(
            parse_clients("portal"),
            Err(ConfigError::InvalidValue("AUTH_CLIENTS"))
        ));
        assert!(matches!(
            parse_clients(""),
            Err(ConfigError::InvalidValue("AUTH_CLIENTS"))
        ));
    }
}
