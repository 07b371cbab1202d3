use sqlx::SqlitePool;

use crate::models::job::Job;
use crate::models::saved_job::SavedJob;

pub async fn find_saved(pool: &SqlitePool, user_id: i64, job_id: i64) -> Result<Option<SavedJob>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM saved_jobs WHERE user_id = ? AND job_id = ?")
        .bind(user_id)
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

/// Returns whether a new bookmark was created.
pub async fn save(pool: &SqlitePool, user_id: i64, job_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO saved_jobs (user_id, job_id) VALUES (?, ?) ON CONFLICT (user_id, job_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(job_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Returns the number of bookmarks removed; zero is not an error.
pub async fn unsave(pool: &SqlitePool, user_id: i64, job_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM saved_jobs WHERE user_id = ? AND job_id = ?")
        .bind(user_id)
        .bind(job_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Jobs the user bookmarked that still exist. Dangling bookmarks are skipped.
pub async fn saved_jobs_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Job>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT jobs.*
        FROM jobs
        WHERE jobs.id IN (SELECT job_id FROM saved_jobs WHERE user_id = ?)
        ORDER BY jobs.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
