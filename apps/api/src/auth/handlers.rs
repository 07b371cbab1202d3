use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{expired_session_cookie, session_cookie};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::user::{Role, User};
use crate::state::AppState;

/// Shown for every login failure so callers cannot tell which check failed.
pub const LOGIN_FAILED: &str = "Invalid credentials or account blocked.";
pub const USERNAME_TAKEN: &str = "Username already exists";

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct FormDescriptor {
    pub action: &'static str,
    pub fields: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<&'static str>>,
}

/// GET /register
pub async fn register_form() -> Json<FormDescriptor> {
    Json(FormDescriptor {
        action: "/register",
        fields: &["username", "password", "role"],
        roles: Some(Role::ALL.iter().map(Role::as_str).collect()),
    })
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, AppError> {
    let role = Role::parse(&form.role)
        .ok_or_else(|| AppError::Validation(format!("Unknown role '{}'", form.role)))?;

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
        .bind(&form.username)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
    }

    let hash = hash_password(&form.password)?;
    let user_id = sqlx::query("INSERT INTO users (username, password, role, active) VALUES (?, ?, ?, 1)")
        .bind(&form.username)
        .bind(&hash)
        .bind(role)
        .execute(&state.db)
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration of the same name.
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(USERNAME_TAKEN.to_string())
            }
            other => AppError::Database(other),
        })?
        .last_insert_rowid();

    info!("Registered user {} ({}) as {}", form.username, user_id, role.as_str());
    Ok(Redirect::to("/login"))
}

/// GET /login
pub async fn login_form() -> Json<FormDescriptor> {
    Json(FormDescriptor {
        action: "/login",
        fields: &["username", "password"],
        roles: None,
    })
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = ?")
        .bind(&form.username)
        .fetch_optional(&state.db)
        .await?;

    match user {
        Some(user) if user.active && verify_password(&form.password, &user.password) => {
            info!("User {} logged in", user.id);
            let jar = jar.add(session_cookie(user.id));
            Ok((jar, Redirect::to("/")).into_response())
        }
        _ => Err(AppError::Unauthorized(LOGIN_FAILED.to_string())),
    }
}

/// GET /logout
pub async fn logout(CurrentUser(user): CurrentUser, jar: SignedCookieJar) -> impl IntoResponse {
    info!("User {} logged out", user.id);
    (jar.remove(expired_session_cookie()), Redirect::to("/login"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::test_support::{body_json, location, TestApp};

    #[tokio::test]
    async fn test_register_redirects_to_login_and_stores_hash() {
        let app = TestApp::new().await;
        let response = app
            .post_form("/register", "username=ada&password=secret-pw&role=employer", None)
            .await;
        assert_eq!(location(&response), Some("/login"));

        let (role, password): (Role, String) =
            sqlx::query_as("SELECT role, password FROM users WHERE username = 'ada'")
                .fetch_one(&app.state.db)
                .await
                .unwrap();
        assert_eq!(role, Role::Employer);
        assert_ne!(password, "secret-pw");
        assert!(verify_password("secret-pw", &password));
    }

    #[tokio::test]
    async fn test_register_duplicate_username_creates_no_second_row() {
        let app = TestApp::new().await;
        app.seed_user("ada", Role::Jobseeker).await;

        let response = app
            .post_form("/register", "username=ada&password=other&role=employer", None)
            .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], USERNAME_TAKEN);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = 'ada'")
            .fetch_one(&app.state.db)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_register_rejects_unknown_role() {
        let app = TestApp::new().await;
        let response = app
            .post_form("/register", "username=eve&password=pw&role=root", None)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_sets_session_and_redirects_home() {
        let app = TestApp::new().await;
        app.seed_user("ada", Role::Employer).await;
        let cookie = app.login("ada").await;

        let response = app.get("/", Some(&cookie)).await;
        let body = body_json(response).await;
        assert_eq!(body["user"]["username"], "ada");
        assert_eq!(body["user"]["role"], "employer");
    }

    #[tokio::test]
    async fn test_login_failures_share_one_generic_message() {
        let app = TestApp::new().await;
        let blocked = app.seed_user("blocked", Role::Jobseeker).await;
        app.seed_user("ada", Role::Jobseeker).await;
        sqlx::query("UPDATE users SET active = 0 WHERE id = ?")
            .bind(blocked)
            .execute(&app.state.db)
            .await
            .unwrap();

        let attempts = [
            format!("username=blocked&password={}", TestApp::PASSWORD),
            "username=ada&password=wrong".to_string(),
            "username=nobody&password=whatever".to_string(),
        ];
        for body in attempts {
            let response = app.post_form("/login", &body, None).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert!(response.headers().get("set-cookie").is_none());
            let body = body_json(response).await;
            assert_eq!(body["error"]["message"], LOGIN_FAILED);
        }
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let app = TestApp::new().await;
        app.seed_user("ada", Role::Jobseeker).await;
        let cookie = app.login("ada").await;

        let response = app.get("/logout", Some(&cookie)).await;
        assert_eq!(location(&response), Some("/login"));
        let cleared = response.headers().get("set-cookie").unwrap().to_str().unwrap();
        assert!(cleared.starts_with("jobboard_session="));
    }

    #[tokio::test]
    async fn test_protected_route_redirects_anonymous_to_login() {
        let app = TestApp::new().await;
        let response = app.get("/my_applications", None).await;
        assert_eq!(location(&response), Some("/login"));
    }

    #[tokio::test]
    async fn test_deactivated_session_is_treated_as_anonymous() {
        let app = TestApp::new().await;
        let id = app.seed_user("ada", Role::Jobseeker).await;
        let cookie = app.login("ada").await;
        sqlx::query("UPDATE users SET active = 0 WHERE id = ?")
            .bind(id)
            .execute(&app.state.db)
            .await
            .unwrap();

        let response = app.get("/my_applications", Some(&cookie)).await;
        assert_eq!(location(&response), Some("/login"));
    }

    #[tokio::test]
    async fn test_forged_cookie_is_ignored() {
        let app = TestApp::new().await;
        app.seed_user("ada", Role::Admin).await;
        let response = app.get("/admin", Some("jobboard_session=1")).await;
        assert_eq!(location(&response), Some("/login"));
    }
}
