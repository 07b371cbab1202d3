use sqlx::SqlitePool;

use crate::models::user::User;

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users ORDER BY id")
        .fetch_all(pool)
        .await
}

/// Flips `active` and returns the new value, or `None` if the user is missing.
pub async fn toggle_active(pool: &SqlitePool, user_id: i64) -> Result<Option<bool>, sqlx::Error> {
    sqlx::query_scalar("UPDATE users SET active = NOT active WHERE id = ? RETURNING active")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Hard-deletes the user row only. Their jobs, applications and bookmarks
/// stay behind with a dangling `user_id`/`employer_id`.
pub async fn delete_user(pool: &SqlitePool, user_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
