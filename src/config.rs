// src/config.rs

use std::{env, fmt, net::SocketAddr, path::PathBuf};

use dotenvy::dotenv;
use url::Url;

/// Runtime configuration, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    /// Directory where uploaded covers are written; served under `/static/uploads`.
    pub upload_dir: PathBuf,
    /// Used to build absolute cover image URLs.
    pub public_base_url: Url,
    pub mail_sender: String,
    /// Length of a loan in days.
    pub loan_days: i64,
}

/// Raised when a variable is missing or cannot be parsed.
#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
            ConfigError::Invalid { key, reason } => write!(f, "{key} is invalid: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://bookswap.db?mode=rwc".to_string());

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        let jwt_expiration = parse_or("JWT_EXPIRATION", 86_400)?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = parse_or("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?;

        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static/uploads"));

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/".to_string());
        let public_base_url = Url::parse(&public_base_url).map_err(|e| ConfigError::Invalid {
            key: "PUBLIC_BASE_URL",
            reason: e.to_string(),
        })?;

        let mail_sender =
            env::var("MAIL_SENDER").unwrap_or_else(|_| "noreply@bookswap.local".to_string());

        let loan_days = parse_or("LOAN_DAYS", 7)?;
        if loan_days <= 0 {
            return Err(ConfigError::Invalid {
                key: "LOAN_DAYS",
                reason: "must be a positive number of days".to_string(),
            });
        }

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            upload_dir,
            public_base_url,
            mail_sender,
            loan_days,
        })
    }
}

fn parse_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
