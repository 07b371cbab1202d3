//! External job feeds: pluggable, trait-based sources of third-party listings.
//!
//! Each feed downloads its provider's full snapshot and maps it to
//! `JobListing`. Filtering happens in `search`, so every feed is treated alike.
//!
//! `AppState` holds the feeds as `Arc<dyn JobFeed>` in search order.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

use crate::aggregator::search::{ApplyTarget, JobListing, Source};
use crate::config::Config;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed returned status {0}")]
    Status(u16),
}

#[async_trait]
pub trait JobFeed: Send + Sync {
    fn source(&self) -> Source;

    /// Fetches every listing the provider currently publishes.
    async fn fetch_all(&self) -> Result<Vec<JobListing>, FeedError>;
}

/// Builds the production feeds sharing one HTTP client.
pub fn build_feeds(config: &Config) -> anyhow::Result<Vec<Arc<dyn JobFeed>>> {
    let client = Client::builder()
        .timeout(config.feed_timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    Ok(vec![
        Arc::new(RemotiveFeed::new(client.clone(), config.remotive_url.clone())),
        Arc::new(ArbeitnowFeed::new(client, config.arbeitnow_url.clone())),
    ])
}

/// GETs `url` and decodes the JSON body. Non-2xx statuses are errors.
async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, FeedError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::Status(status.as_u16()));
    }
    Ok(response.json().await?)
}

// ────────────────────────────────────────────────────────────────────────────
// Remotive
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RemotivePayload {
    #[serde(default)]
    jobs: Vec<RemotiveJob>,
}

#[derive(Debug, Deserialize)]
struct RemotiveJob {
    title: String,
    company_name: String,
    #[serde(default)]
    candidate_required_location: String,
    url: String,
}

pub struct RemotiveFeed {
    client: Client,
    url: String,
}

impl RemotiveFeed {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl JobFeed for RemotiveFeed {
    fn source(&self) -> Source {
        Source::Remotive
    }

    async fn fetch_all(&self) -> Result<Vec<JobListing>, FeedError> {
        let payload: RemotivePayload = get_json(&self.client, &self.url).await?;
        Ok(payload
            .jobs
            .into_iter()
            .map(|j| JobListing {
                title: j.title,
                company: j.company_name,
                location: j.candidate_required_location,
                category: "Remote".to_string(),
                source: Source::Remotive,
                apply: ApplyTarget::External { url: j.url },
            })
            .collect())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Arbeitnow
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ArbeitnowPayload {
    #[serde(default)]
    data: Vec<ArbeitnowJob>,
}

#[derive(Debug, Deserialize)]
struct ArbeitnowJob {
    title: String,
    company_name: String,
    #[serde(default)]
    location: String,
    url: String,
}

pub struct ArbeitnowFeed {
    client: Client,
    url: String,
}

impl ArbeitnowFeed {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl JobFeed for ArbeitnowFeed {
    fn source(&self) -> Source {
        Source::Arbeitnow
    }

    async fn fetch_all(&self) -> Result<Vec<JobListing>, FeedError> {
        let payload: ArbeitnowPayload = get_json(&self.client, &self.url).await?;
        Ok(payload
            .data
            .into_iter()
            .map(|j| JobListing {
                title: j.title,
                company: j.company_name,
                location: j.location,
                category: "General".to_string(),
                source: Source::Arbeitnow,
                apply: ApplyTarget::External { url: j.url },
            })
            .collect())
    }
}
