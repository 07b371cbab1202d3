use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_STATUS: &str = "Pending";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: i64,
    pub user_id: i64,
    pub job_id: i64,
    /// `Pending` on creation; afterwards whatever the employer sets.
    pub status: String,
    /// Stored filename under the uploads directory.
    pub resume: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}
