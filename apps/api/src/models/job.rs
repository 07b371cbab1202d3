use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    /// Free text, e.g. "80k-100k" or "competitive".
    pub salary: String,
    pub category: String,
    pub description: String,
    pub employer_id: i64,
    pub contact_email: String,
    pub contact_phone: String,
}
