//! Shared fixtures for router-level tests: an in-memory database, a temp
//! uploads directory, canned feeds and request helpers.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::aggregator::feeds::{FeedError, JobFeed};
use crate::aggregator::{ApplyTarget, JobListing, Source};
use crate::applications::queries::{insert_application, CandidateDetails};
use crate::auth::password::hash_with;
use crate::config::Config;
use crate::db::run_migrations;
use crate::jobs::queries::{insert_job, NewJob};
use crate::models::user::Role;
use crate::routes::build_router;
use crate::state::AppState;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    uploads: TempDir,
}

impl TestApp {
    pub const PASSWORD: &'static str = "correct-horse";

    pub async fn new() -> Self {
        Self::with_feeds(Vec::new()).await
    }

    pub async fn with_feeds(feeds: Vec<Arc<dyn JobFeed>>) -> Self {
        let uploads = tempfile::tempdir().unwrap();

        // A single connection that never recycles keeps the in-memory database alive.
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(false);
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .unwrap();
        run_migrations(&db).await.unwrap();

        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            secret_key: "test-secret-key".to_string(),
            upload_dir: uploads.path().to_path_buf(),
            max_upload_bytes: 1024 * 1024,
            remotive_url: String::new(),
            arbeitnow_url: String::new(),
            feed_timeout: Duration::from_secs(5),
            port: 0,
            rust_log: "debug".to_string(),
        };
        let state = AppState::new(db, config, feeds);
        let router = build_router(state.clone());

        TestApp {
            router,
            state,
            uploads,
        }
    }

    pub fn upload_dir(&self) -> &Path {
        self.uploads.path()
    }

    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.request(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Inserts an active user whose password is `TestApp::PASSWORD`, hashed
    /// with cheap Argon2 parameters so tests stay fast.
    pub async fn seed_user(&self, username: &str, role: Role) -> i64 {
        let argon2 = Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            Params::new(1024, 1, 1, None).unwrap(),
        );
        let hash = hash_with(&argon2, Self::PASSWORD).unwrap();
        sqlx::query("INSERT INTO users (username, password, role, active) VALUES (?, ?, ?, 1)")
            .bind(username)
            .bind(hash)
            .bind(role)
            .execute(&self.state.db)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    /// Logs in through the real endpoint and returns a `Cookie` header value.
    pub async fn login(&self, username: &str) -> String {
        let body = format!("username={username}&password={}", Self::PASSWORD);
        let response = self.post_form("/login", &body, None).await;
        assert_eq!(location(&response), Some("/"), "login failed for {username}");
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("login sets a session cookie")
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    pub async fn seed_job(
        &self,
        employer_id: i64,
        title: &str,
        company: &str,
        location: &str,
        category: &str,
    ) -> i64 {
        let job = NewJob {
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            salary: "competitive".to_string(),
            category: category.to_string(),
            description: format!("{title} at {company}"),
            contact_email: "hr@example.com".to_string(),
            contact_phone: "555-0100".to_string(),
        };
        insert_job(&self.state.db, employer_id, &job).await.unwrap()
    }

    pub async fn seed_application(&self, user_id: i64, job_id: i64) -> i64 {
        let details = CandidateDetails {
            full_name: "Sam Seeker".to_string(),
            email: "sam@example.com".to_string(),
            phone: "555-0199".to_string(),
            message: "Hire me".to_string(),
        };
        let resume = format!("{user_id}_{job_id}_cv.pdf");
        insert_application(&self.state.db, user_id, job_id, &resume, &details)
            .await
            .unwrap()
            .expect("no prior application")
    }
}

pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// Builds a multipart POST to `/apply/{job_id}`. An empty `filename` omits
/// the resume part entirely.
pub fn multipart_apply(job_id: i64, cookie: &str, filename: &str, contents: &[u8]) -> Request<Body> {
    const BOUNDARY: &str = "jobboard-test-boundary";
    let mut body = Vec::new();
    for (name, value) in [
        ("full_name", "Sam Seeker"),
        ("email", "sam@example.com"),
        ("phone", "555-0199"),
        ("message", "I would love to join."),
    ] {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
    }
    if !filename.is_empty() {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(format!("/apply/{job_id}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}

pub fn external(source: Source, title: &str) -> JobListing {
    JobListing {
        title: title.to_string(),
        company: format!("{source:?} Co"),
        location: "Anywhere".to_string(),
        category: "Remote".to_string(),
        source,
        apply: ApplyTarget::External {
            url: format!("https://jobs.example/{}", title.replace(' ', "-")),
        },
    }
}

/// Feed returning a fixed snapshot, or failing every time.
pub struct StaticFeed {
    source: Source,
    listings: Option<Vec<JobListing>>,
}

impl StaticFeed {
    pub fn ok(source: Source, listings: Vec<JobListing>) -> Self {
        Self {
            source,
            listings: Some(listings),
        }
    }

    pub fn failing(source: Source) -> Self {
        Self {
            source,
            listings: None,
        }
    }
}

#[async_trait]
impl JobFeed for StaticFeed {
    fn source(&self) -> Source {
        self.source
    }

    async fn fetch_all(&self) -> Result<Vec<JobListing>, FeedError> {
        self.listings.clone().ok_or(FeedError::Status(502))
    }
}
