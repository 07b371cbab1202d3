use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::aggregator::feeds::JobFeed;
use crate::errors::AppError;
use crate::jobs::queries::list_jobs;
use crate::models::job::Job;

// ────────────────────────────────────────────────────────────────────────────
// Result shape shared by every source
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Source {
    Internal,
    Remotive,
    Arbeitnow,
}

/// Where a seeker goes to apply: the in-app flow, or an external URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "apply_type", rename_all = "lowercase")]
pub enum ApplyTarget {
    Internal { job_id: i64 },
    External { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub category: String,
    pub source: Source,
    #[serde(flatten)]
    pub apply: ApplyTarget,
}

impl From<Job> for JobListing {
    fn from(job: Job) -> Self {
        JobListing {
            title: job.title,
            company: job.company,
            location: job.location,
            category: job.category,
            source: Source::Internal,
            apply: ApplyTarget::Internal { job_id: job.id },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Filters
// ────────────────────────────────────────────────────────────────────────────

/// Query parameters of `/jobs`. Missing or empty filters match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilters {
    #[serde(default, rename = "search")]
    pub keyword: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
}

impl SearchFilters {
    pub fn normalized(&self) -> SearchFilters {
        SearchFilters {
            keyword: self.keyword.to_lowercase(),
            location: self.location.to_lowercase(),
            category: self.category.to_lowercase(),
        }
    }

    /// Internal jobs match on keyword against "title company", plus location
    /// and category substrings. Expects `self` to be normalized.
    pub fn matches_job(&self, job: &Job) -> bool {
        format!("{} {}", job.title, job.company)
            .to_lowercase()
            .contains(&self.keyword)
            && job.location.to_lowercase().contains(&self.location)
            && job.category.to_lowercase().contains(&self.category)
    }

    /// External listings only honour the keyword, matched against the title.
    pub fn matches_external(&self, listing: &JobListing) -> bool {
        listing.title.to_lowercase().contains(&self.keyword)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Aggregation
// ────────────────────────────────────────────────────────────────────────────

/// Internal matches first, then each feed's matches in feed order.
///
/// Feeds are fetched concurrently. A feed that errors, times out, or panics
/// contributes nothing; only a database failure fails the search.
pub async fn search_jobs(
    db: &SqlitePool,
    feeds: &[Arc<dyn JobFeed>],
    filters: &SearchFilters,
) -> Result<Vec<JobListing>, AppError> {
    let filters = filters.normalized();

    // No feed fetch starts unless the database read succeeds.
    let internal = list_jobs(db).await?;

    let pending: Vec<_> = feeds
        .iter()
        .map(|feed| {
            let feed = Arc::clone(feed);
            tokio::spawn(async move { (feed.source(), feed.fetch_all().await) })
        })
        .collect();

    let mut results: Vec<JobListing> = internal
        .into_iter()
        .filter(|job| filters.matches_job(job))
        .map(JobListing::from)
        .collect();
    let internal_count = results.len();

    for handle in pending {
        match handle.await {
            Ok((source, Ok(listings))) => {
                let before = results.len();
                results.extend(listings.into_iter().filter(|l| filters.matches_external(l)));
                debug!("{source:?} contributed {} listings", results.len() - before);
            }
            Ok((source, Err(e))) => warn!("{source:?} feed unavailable, skipping: {e}"),
            Err(e) => warn!("Feed task failed, skipping: {e}"),
        }
    }

    debug!(
        "Search {:?} matched {} internal and {} external listings",
        filters.keyword,
        internal_count,
        results.len() - internal_count
    );
    Ok(results)
}
