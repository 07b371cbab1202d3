use std::collections::HashMap;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::applications::queries::{self, CandidateDetails};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::jobs::handlers::require_job;
use crate::models::application::Application;
use crate::models::job::Job;
use crate::models::user::Role;
use crate::state::AppState;
use crate::storage::{resume_filename, stage_upload};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ApplyFormResponse {
    pub job: Job,
    pub fields: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct ApplicationSubmitted {
    pub application: Application,
    pub job: Job,
}

#[derive(Debug, Serialize)]
pub struct ApplicantsResponse {
    pub job: Job,
    pub applications: Vec<Application>,
}

#[derive(Debug, Serialize)]
pub struct MyApplication {
    pub application: Application,
    /// `None` once the job has been deleted out from under the application.
    pub job: Option<Job>,
}

#[derive(Debug, Serialize)]
pub struct MyApplicationsResponse {
    pub applications: Vec<MyApplication>,
}

struct ResumeUpload {
    filename: String,
    bytes: Vec<u8>,
}

const APPLY_FIELDS: &[&str] = &["full_name", "email", "phone", "message", "resume"];

/// Over-limit bodies keep their 413; every other malformed body is a 400.
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(e.body_text())
    }
}

/// Pulls the candidate text fields and the `resume` file out of the body.
/// Every field is required; unknown fields are ignored.
async fn read_application_form(
    mut multipart: Multipart,
) -> Result<(CandidateDetails, ResumeUpload), AppError> {
    let mut full_name = None;
    let mut email = None;
    let mut phone = None;
    let mut message = None;
    let mut resume = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        let name = field.name().unwrap_or_default().to_string();
        let slot = match name.as_str() {
            "full_name" => &mut full_name,
            "email" => &mut email,
            "phone" => &mut phone,
            "message" => &mut message,
            "resume" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(multipart_error)?;
                resume = Some(ResumeUpload {
                    filename,
                    bytes: bytes.to_vec(),
                });
                continue;
            }
            _ => continue,
        };
        *slot = Some(
            field
                .text()
                .await
                .map_err(multipart_error)?,
        );
    }

    let require = |value: Option<String>, field: &str| {
        value.ok_or_else(|| AppError::Validation(format!("Missing field '{field}'")))
    };
    let details = CandidateDetails {
        full_name: require(full_name, "full_name")?,
        email: require(email, "email")?,
        phone: require(phone, "phone")?,
        message: require(message, "message")?,
    };
    let resume = resume
        .filter(|r| !r.filename.is_empty())
        .ok_or_else(|| AppError::Validation("A resume file is required".to_string()))?;

    Ok((details, resume))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /apply/:id
pub async fn apply_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(job_id): Path<i64>,
) -> Result<Response, AppError> {
    let job = require_job(&state, job_id).await?;
    if !user.is(Role::Jobseeker) {
        return Ok(Redirect::to("/jobs").into_response());
    }
    Ok(Json(ApplyFormResponse {
        job,
        fields: APPLY_FIELDS,
    })
    .into_response())
}

/// POST /apply/:id
///
/// One application per seeker and job: a repeat submission is redirected to
/// `/my_applications` without touching the stored resume. The resume only
/// takes its final name after the row is inserted, so a racing duplicate
/// never replaces the file of the application that won.
pub async fn apply(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(job_id): Path<i64>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let job = require_job(&state, job_id).await?;
    if !user.is(Role::Jobseeker) {
        return Ok(Redirect::to("/jobs").into_response());
    }
    if queries::find_for_user_and_job(&state.db, user.id, job_id)
        .await?
        .is_some()
    {
        return Ok(Redirect::to("/my_applications").into_response());
    }

    let (details, resume) = read_application_form(multipart).await?;
    let stored_name = resume_filename(user.id, job_id, &resume.filename);
    let upload_dir = &state.config.upload_dir;
    let staged = stage_upload(upload_dir, &resume.bytes).await?;

    let inserted =
        queries::insert_application(&state.db, user.id, job_id, &stored_name, &details).await;
    let app_id = match inserted {
        Ok(Some(app_id)) => app_id,
        Ok(None) => {
            staged.discard().await;
            return Ok(Redirect::to("/my_applications").into_response());
        }
        Err(e) => {
            staged.discard().await;
            return Err(e.into());
        }
    };
    staged.commit(upload_dir, &stored_name).await?;
    info!("User {} applied to job {job_id} (application {app_id})", user.id);

    let application = queries::find_application(&state.db, app_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {app_id} not found")))?;
    Ok((
        StatusCode::CREATED,
        Json(ApplicationSubmitted { application, job }),
    )
        .into_response())
}

/// GET /applicants/:id
pub async fn applicants(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(job_id): Path<i64>,
) -> Result<Response, AppError> {
    let job = require_job(&state, job_id).await?;
    if job.employer_id != user.id {
        return Ok(Redirect::to("/").into_response());
    }
    let applications = queries::list_for_job(&state.db, job_id).await?;
    Ok(Json(ApplicantsResponse { job, applications }).into_response())
}

/// GET /update_status/:app_id/:status
///
/// The status is free text taken verbatim from the path.
pub async fn update_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((app_id, status)): Path<(i64, String)>,
) -> Result<Redirect, AppError> {
    let application = queries::find_application(&state.db, app_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {app_id} not found")))?;
    let job = require_job(&state, application.job_id).await?;
    if job.employer_id != user.id {
        return Ok(Redirect::to("/"));
    }

    queries::set_status(&state.db, app_id, &status).await?;
    info!("Employer {} set application {app_id} to {status:?}", user.id);
    Ok(Redirect::to(&format!("/applicants/{}", job.id)))
}

/// GET /my_applications
pub async fn my_applications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<MyApplicationsResponse>, AppError> {
    let applications = queries::list_for_user(&state.db, user.id).await?;
    let jobs: HashMap<i64, Job> = queries::jobs_applied_to(&state.db, user.id)
        .await?
        .into_iter()
        .map(|job| (job.id, job))
        .collect();

    let applications = applications
        .into_iter()
        .map(|application| MyApplication {
            job: jobs.get(&application.job_id).cloned(),
            application,
        })
        .collect();
    Ok(Json(MyApplicationsResponse { applications }))
}
