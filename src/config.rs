use dotenv::dotenv;
use std::env;

use crate::errors::Error;

/// Page size used when a listing is requested with a zero limit.
pub const DEFAULT_LIMIT: i64 = 20;

/// Lifetime of an issued session token.
pub const TOKEN_TTL_HOURS: i64 = 72;

pub const DEFAULT_POOL_SIZE: u32 = 8;

/// Process configuration, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub secret: Vec<u8>,
    pub pool_size: u32,
}

impl Config {
    /// Loads `.env` (if present) and then reads `DATABASE_URL`, `SECRET_KEY`
    /// and the optional `DATABASE_POOL_SIZE`.
    pub fn from_env() -> Result<Config, Error> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| Error::Config("No DATABASE_URL environment variable found".into()))?;
        let secret = env::var("SECRET_KEY")
            .map_err(|_| Error::Config("No SECRET_KEY environment variable found".into()))?;
        if secret.is_empty() {
            return Err(Error::Config("SECRET_KEY must not be empty".into()));
        }

        let pool_size = match env::var("DATABASE_POOL_SIZE") {
            Ok(size) => size
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| Error::Config(format!("Invalid DATABASE_POOL_SIZE: {}", size)))?,
            Err(_) => DEFAULT_POOL_SIZE,
        };

        Ok(Config {
            database_url,
            secret: secret.into_bytes(),
            pool_size,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("secret", &"<redacted>")
            .field("pool_size", &self.pool_size)
            .finish()
    }
}
