use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "jobboard_session";

/// Signed cookie carrying the logged-in user's id.
pub fn session_cookie(user_id: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, user_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Resolves the session cookie to an active user.
///
/// Blocked or deleted users resolve to `None`, so toggling `active` off logs
/// the user out on their next request.
async fn load_session_user(jar: &SignedCookieJar, db: &SqlitePool) -> Result<Option<User>, AppError> {
    let Some(user_id) = jar
        .get(SESSION_COOKIE)
        .and_then(|c| c.value().parse::<i64>().ok())
    else {
        return Ok(None);
    };

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(db)
        .await?;

    Ok(user.filter(|u| u.active))
}

/// Extractor for login-required routes. Anonymous requests are redirected to `/login`.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar: SignedCookieJar = SignedCookieJar::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});

        match load_session_user(&jar, &state.db).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => {
                tracing::debug!("No active session for {}, redirecting to login", parts.uri);
                Err(Redirect::to("/login").into_response())
            }
            Err(e) => Err(e.into_response()),
        }
    }
}

/// Extractor for public routes that still want to know who is asking.
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar: SignedCookieJar = SignedCookieJar::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});

        Ok(MaybeUser(load_session_user(&jar, &state.db).await?))
    }
}
