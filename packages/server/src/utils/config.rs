use axum::http::HeaderValue;
use std::env;
use std::net::SocketAddr;

pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SERVER_ADDR is not a socket address: {0}")]
    InvalidAddr(String),
    #[error("CORS_ORIGIN is not a valid header value: {0}")]
    InvalidOrigin(String),
}

/// Process-level settings: where to listen, who may call us, and the key
/// seat tokens are signed with.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    pub jwt_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup("SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let server_addr = addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddr(addr.clone()))?;

        let origin = lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
        let cors_origin = origin
            .parse::<HeaderValue>()
            .map_err(|_| ConfigError::InvalidOrigin(origin.clone()))?;

        let jwt_secret = lookup("JWT_SECRET").filter(|secret| !secret.is_empty());

        Ok(Self {
            server_addr,
            cors_origin,
            jwt_secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.server_addr, DEFAULT_SERVER_ADDR.parse().unwrap());
        assert_eq!(config.cors_origin, DEFAULT_CORS_ORIGIN);
        assert!(config.jwt_secret.is_none());
    }

    #[test]
    fn jwt_secret_is_read_and_blank_means_unset() {
        let config = Config::from_lookup(|key| match key {
            "JWT_SECRET" => Some("s3cret".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.jwt_secret.as_deref(), Some("s3cret"));

        let config = Config::from_lookup(|key| match key {
            "JWT_SECRET" => Some(String::new()),
            _ => None,
        })
        .unwrap();
        assert!(config.jwt_secret.is_none());
    }

    #[test]
    fn bad_address_is_an_error() {
        let result = Config::from_lookup(|key| match key {
            "SERVER_ADDR" => Some("not-an-addr".to_string()),
            _ => None,
        });
        assert!(matches!(result, Err(ConfigError::InvalidAddr(_))));
    }
}
