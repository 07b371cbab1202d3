use serde::Deserialize;
use sqlx::SqlitePool;

use crate::models::job::Job;

/// Fields an employer submits when posting a job.
#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub category: String,
    pub description: String,
    pub contact_email: String,
    pub contact_phone: String,
}

/// Fields an owner may change after posting. Contact details are fixed.
#[derive(Debug, Clone, Deserialize)]
pub struct JobEdit {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub category: String,
    pub description: String,
}

pub async fn find_job(pool: &SqlitePool, job_id: i64) -> Result<Option<Job>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM jobs WHERE id = ?")
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_jobs(pool: &SqlitePool) -> Result<Vec<Job>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM jobs ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn list_jobs_by_employer(pool: &SqlitePool, employer_id: i64) -> Result<Vec<Job>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM jobs WHERE employer_id = ? ORDER BY id")
        .bind(employer_id)
        .fetch_all(pool)
        .await
}

pub async fn insert_job(pool: &SqlitePool, employer_id: i64, job: &NewJob) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO jobs
            (title, company, location, salary, category, description,
             employer_id, contact_email, contact_phone)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&job.title)
    .bind(&job.company)
    .bind(&job.location)
    .bind(&job.salary)
    .bind(&job.category)
    .bind(&job.description)
    .bind(employer_id)
    .bind(&job.contact_email)
    .bind(&job.contact_phone)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update_job(pool: &SqlitePool, job_id: i64, edit: &JobEdit) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE jobs
        SET title = ?, company = ?, location = ?, salary = ?, category = ?, description = ?
        WHERE id = ?
        "#,
    )
    .bind(&edit.title)
    .bind(&edit.company)
    .bind(&edit.location)
    .bind(&edit.salary)
    .bind(&edit.category)
    .bind(&edit.description)
    .bind(job_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Deletes a job together with its applications, atomically.
/// Saved-job bookmarks pointing at it are left behind.
/// Returns the number of applications removed.
pub async fn delete_job(pool: &SqlitePool, job_id: i64) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let removed = sqlx::query("DELETE FROM applications WHERE job_id = ?")
        .bind(job_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    sqlx::query("DELETE FROM jobs WHERE id = ?")
        .bind(job_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(removed)
}
