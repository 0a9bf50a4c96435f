//! Server runtime configuration.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use lifedesk_core::DEFAULT_TOKEN_TTL;

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_DB_FILE_NAME: &str = "lifedesk.sqlite3";
const MIN_SECRET_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub db_path: PathBuf,
    /// `None` means an ephemeral secret is generated at startup.
    pub token_secret: Option<String>,
    pub token_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            token_secret: None,
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBind(String),
    EmptyDbPath,
    ZeroTokenTtl,
    SecretTooShort { len: usize, min: usize },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBind(raw) => write!(f, "invalid bind address `{raw}`"),
            Self::EmptyDbPath => write!(f, "database path must not be empty"),
            Self::ZeroTokenTtl => write!(f, "token ttl must be greater than zero"),
            Self::SecretTooShort { len, min } => {
                write!(f, "token secret is {len} bytes; at least {min} required")
            }
        }
    }
}

impl Error for ConfigError {}

impl ServerConfig {
    /// Checks the configuration and returns the parsed listen address.
    pub fn validate(&self) -> Result<SocketAddr, ConfigError> {
        let addr = self
            .bind
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBind(self.bind.clone()))?;
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDbPath);
        }
        if self.token_ttl.is_zero() {
            return Err(ConfigError::ZeroTokenTtl);
        }
        if let Some(secret) = &self.token_secret {
            if secret.len() < MIN_SECRET_LEN {
                return Err(ConfigError::SecretTooShort {
                    len: secret.len(),
                    min: MIN_SECRET_LEN,
                });
            }
        }
        Ok(addr)
    }
}
