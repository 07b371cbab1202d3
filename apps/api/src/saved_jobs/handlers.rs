use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::job::Job;
use crate::models::user::Role;
use crate::saved_jobs::queries;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SavedJobsResponse {
    pub jobs: Vec<Job>,
}

/// GET /save_job/:id
///
/// The job id is not checked against the jobs table.
pub async fn save_job(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(job_id): Path<i64>,
) -> Result<Redirect, AppError> {
    if !user.is(Role::Jobseeker) {
        return Ok(Redirect::to("/jobs"));
    }

    if queries::find_saved(&state.db, user.id, job_id).await?.is_none()
        && queries::save(&state.db, user.id, job_id).await?
    {
        info!("User {} saved job {job_id}", user.id);
    } else {
        debug!("User {} already saved job {job_id}", user.id);
    }
    Ok(Redirect::to("/jobs"))
}

/// GET /unsave_job/:id
pub async fn unsave_job(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(job_id): Path<i64>,
) -> Result<Redirect, AppError> {
    if !user.is(Role::Jobseeker) {
        return Ok(Redirect::to("/jobs"));
    }

    let removed = queries::unsave(&state.db, user.id, job_id).await?;
    if removed > 0 {
        info!("User {} unsaved job {job_id}", user.id);
    }
    Ok(Redirect::to("/saved_jobs"))
}

/// GET /saved_jobs
pub async fn saved_jobs(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    if !user.is(Role::Jobseeker) {
        return Ok(Redirect::to("/jobs").into_response());
    }
    let jobs = queries::saved_jobs_for_user(&state.db, user.id).await?;
    Ok(Json(SavedJobsResponse { jobs }).into_response())
}
