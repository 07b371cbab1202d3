use axum::Json;
use serde::Serialize;

use crate::auth::MaybeUser;
use crate::models::user::User;

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub service: &'static str,
    pub user: Option<User>,
}

/// GET /
pub async fn index_handler(MaybeUser(user): MaybeUser) -> Json<IndexResponse> {
    Json(IndexResponse {
        service: "jobboard",
        user,
    })
}
