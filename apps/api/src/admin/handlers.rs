use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::admin::queries;
use crate::applications::queries::list_all as list_applications;
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::jobs::queries::list_jobs;
use crate::models::application::Application;
use crate::models::job::Job;
use crate::models::user::{Role, User};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AdminOverview {
    pub users: Vec<User>,
    pub jobs: Vec<Job>,
    pub applications: Vec<Application>,
}

/// GET /admin
pub async fn overview(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    if !user.is(Role::Admin) {
        return Ok(Redirect::to("/").into_response());
    }
    Ok(Json(AdminOverview {
        users: queries::list_users(&state.db).await?,
        jobs: list_jobs(&state.db).await?,
        applications: list_applications(&state.db).await?,
    })
    .into_response())
}

/// GET /toggle_user/:id
pub async fn toggle_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<i64>,
) -> Result<Redirect, AppError> {
    if !user.is(Role::Admin) {
        return Ok(Redirect::to("/"));
    }
    let active = queries::toggle_active(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
    info!("Admin {} set user {user_id} active={active}", user.id);
    Ok(Redirect::to("/admin"))
}

/// GET /delete_user/:id
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<i64>,
) -> Result<Redirect, AppError> {
    if !user.is(Role::Admin) {
        return Ok(Redirect::to("/"));
    }
    let removed = queries::delete_user(&state.db, user_id).await?;
    info!("Admin {} deleted user {user_id} ({removed} rows)", user.id);
    Ok(Redirect::to("/admin"))
}
