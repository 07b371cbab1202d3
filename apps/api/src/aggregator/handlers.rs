use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::aggregator::search::{search_jobs, JobListing, SearchFilters};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct JobSearchResponse {
    pub count: usize,
    pub jobs: Vec<JobListing>,
}

/// GET /jobs?search=&location=&category=
pub async fn handle_search(
    State(state): State<AppState>,
    Query(filters): Query<SearchFilters>,
) -> Result<Json<JobSearchResponse>, AppError> {
    let jobs = search_jobs(&state.db, &state.feeds, &filters).await?;
    Ok(Json(JobSearchResponse {
        count: jobs.len(),
        jobs,
    }))
}
