use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_SECRET_KEY: &str = "dev_secret_key";
const DEFAULT_DATABASE_URL: &str = "sqlite:database.db";
const REMOTIVE_API_URL: &str = "https://remotive.com/api/remote-jobs";
const ARBEITNOW_API_URL: &str = "https://www.arbeitnow.com/api/job-board-api";

/// Application configuration loaded from environment variables.
/// Every setting has a default so a bare checkout starts without a `.env`.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Stretched into the cookie signing key. The default is insecure.
    pub secret_key: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub remotive_url: String,
    pub arbeitnow_url: String,
    pub feed_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            secret_key: env_or("SECRET_KEY", DEFAULT_SECRET_KEY),
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "uploads")),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", "16777216")
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            remotive_url: env_or("REMOTIVE_URL", REMOTIVE_API_URL),
            arbeitnow_url: env_or("ARBEITNOW_URL", ARBEITNOW_API_URL),
            feed_timeout: Duration::from_secs(
                env_or("FEED_TIMEOUT_SECS", "5")
                    .parse::<u64>()
                    .context("FEED_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
