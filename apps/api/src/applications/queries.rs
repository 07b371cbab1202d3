use sqlx::SqlitePool;

use crate::models::application::{Application, DEFAULT_STATUS};
use crate::models::job::Job;

/// Candidate details captured alongside the resume.
#[derive(Debug, Clone, Default)]
pub struct CandidateDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

pub async fn find_application(pool: &SqlitePool, app_id: i64) -> Result<Option<Application>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM applications WHERE id = ?")
        .bind(app_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_for_user_and_job(
    pool: &SqlitePool,
    user_id: i64,
    job_id: i64,
) -> Result<Option<Application>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM applications WHERE user_id = ? AND job_id = ?")
        .bind(user_id)
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_job(pool: &SqlitePool, job_id: i64) -> Result<Vec<Application>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM applications WHERE job_id = ? ORDER BY id")
        .bind(job_id)
        .fetch_all(pool)
        .await
}

pub async fn list_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Application>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM applications WHERE user_id = ? ORDER BY id")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Jobs that still exist among those the user has applied to.
pub async fn jobs_applied_to(pool: &SqlitePool, user_id: i64) -> Result<Vec<Job>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM jobs WHERE id IN (SELECT job_id FROM applications WHERE user_id = ?)",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Application>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM applications ORDER BY id")
        .fetch_all(pool)
        .await
}

/// Inserts a `Pending` application. Returns `None` when one already exists
/// for the pair, which only happens when two submissions race.
pub async fn insert_application(
    pool: &SqlitePool,
    user_id: i64,
    job_id: i64,
    resume: &str,
    details: &CandidateDetails,
) -> Result<Option<i64>, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO applications
            (user_id, job_id, status, resume, full_name, email, phone, message)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (user_id, job_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(job_id)
    .bind(DEFAULT_STATUS)
    .bind(resume)
    .bind(&details.full_name)
    .bind(&details.email)
    .bind(&details.phone)
    .bind(&details.message)
    .execute(pool)
    .await?;

    Ok((result.rows_affected() == 1).then(|| result.last_insert_rowid()))
}

pub async fn set_status(pool: &SqlitePool, app_id: i64, status: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE applications SET status = ? WHERE id = ?")
        .bind(status)
        .bind(app_id)
        .execute(pool)
        .await?;
    Ok(())
}
