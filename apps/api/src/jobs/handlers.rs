use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Serialize;
use tracing::info;

use crate::auth::handlers::FormDescriptor;
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::jobs::queries::{self, JobEdit, NewJob};
use crate::models::job::Job;
use crate::models::user::Role;
use crate::state::AppState;

const JOB_FIELDS: &[&str] = &[
    "title",
    "company",
    "location",
    "salary",
    "category",
    "description",
    "contact_email",
    "contact_phone",
];

const EDITABLE_FIELDS: &[&str] = &["title", "company", "location", "salary", "category", "description"];

#[derive(Debug, Serialize)]
pub struct EmployerJobsResponse {
    pub jobs: Vec<Job>,
}

#[derive(Debug, Serialize)]
pub struct EditJobResponse {
    pub job: Job,
    pub editable_fields: &'static [&'static str],
}

pub(crate) async fn require_job(state: &AppState, job_id: i64) -> Result<Job, AppError> {
    queries::find_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

/// GET /post_job
pub async fn post_job_form(CurrentUser(user): CurrentUser) -> Response {
    if !user.is(Role::Employer) {
        return Redirect::to("/").into_response();
    }
    Json(FormDescriptor {
        action: "/post_job",
        fields: JOB_FIELDS,
        roles: None,
    })
    .into_response()
}

/// POST /post_job
pub async fn post_job(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(job): Form<NewJob>,
) -> Result<Redirect, AppError> {
    if !user.is(Role::Employer) {
        return Ok(Redirect::to("/"));
    }
    let job_id = queries::insert_job(&state.db, user.id, &job).await?;
    info!("Employer {} posted job {job_id} ({})", user.id, job.title);
    Ok(Redirect::to("/employer_jobs"))
}

/// GET /job/:id
pub async fn job_detail(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<Json<Job>, AppError> {
    Ok(Json(require_job(&state, job_id).await?))
}

/// GET /edit_job/:id
pub async fn edit_job_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(job_id): Path<i64>,
) -> Result<Response, AppError> {
    let job = require_job(&state, job_id).await?;
    if !user.is(Role::Employer) || job.employer_id != user.id {
        return Ok(Redirect::to("/").into_response());
    }
    Ok(Json(EditJobResponse {
        job,
        editable_fields: EDITABLE_FIELDS,
    })
    .into_response())
}

/// POST /edit_job/:id
pub async fn edit_job(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(job_id): Path<i64>,
    Form(edit): Form<JobEdit>,
) -> Result<Redirect, AppError> {
    let job = require_job(&state, job_id).await?;
    if !user.is(Role::Employer) || job.employer_id != user.id {
        return Ok(Redirect::to("/"));
    }
    queries::update_job(&state.db, job_id, &edit).await?;
    info!("Employer {} edited job {job_id}", user.id);
    Ok(Redirect::to("/employer_jobs"))
}

/// GET /employer_jobs
pub async fn employer_jobs(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    if !user.is(Role::Employer) {
        return Ok(Redirect::to("/").into_response());
    }
    let jobs = queries::list_jobs_by_employer(&state.db, user.id).await?;
    Ok(Json(EmployerJobsResponse { jobs }).into_response())
}

/// GET /delete_job/:id
///
/// Admins may delete any job; employers only their own.
pub async fn delete_job(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(job_id): Path<i64>,
) -> Result<Redirect, AppError> {
    let job = require_job(&state, job_id).await?;
    let is_owner = user.is(Role::Employer) && job.employer_id == user.id;
    if !user.is(Role::Admin) && !is_owner {
        return Ok(Redirect::to("/"));
    }

    let removed = queries::delete_job(&state.db, job_id).await?;
    info!(
        "User {} deleted job {job_id} and {removed} applications",
        user.id
    );

    if user.is(Role::Admin) {
        Ok(Redirect::to("/admin"))
    } else {
        Ok(Redirect::to("/employer_jobs"))
    }
}
