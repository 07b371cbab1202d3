use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use sqlx::SqlitePool;

use crate::aggregator::feeds::JobFeed;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    /// External listing sources, queried in this order on every search.
    pub feeds: Arc<[Arc<dyn JobFeed>]>,
    /// Signs the session cookie. Derived from `Config::secret_key`.
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config, feeds: Vec<Arc<dyn JobFeed>>) -> Self {
        let cookie_key = derive_cookie_key(&config.secret_key);
        Self {
            db,
            config,
            feeds: feeds.into(),
            cookie_key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// `Key::from` needs 64 bytes of material; SHA-512 stretches any secret to that.
fn derive_cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}
