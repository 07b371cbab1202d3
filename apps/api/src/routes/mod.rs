pub mod health;
pub mod index;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::services::ServeDir;

use crate::admin::handlers as admin;
use crate::aggregator::handlers as search;
use crate::applications::handlers as applications;
use crate::auth::handlers as auth;
use crate::jobs::handlers as jobs;
use crate::saved_jobs::handlers as saved;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.config.upload_dir);
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/", get(index::index_handler))
        .route("/health", get(health::health_handler))
        // Auth
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        // Employer job management
        .route("/post_job", get(jobs::post_job_form).post(jobs::post_job))
        .route("/edit_job/:id", get(jobs::edit_job_form).post(jobs::edit_job))
        .route("/employer_jobs", get(jobs::employer_jobs))
        .route("/delete_job/:id", get(jobs::delete_job))
        .route("/job/:id", get(jobs::job_detail))
        // Applications
        .route(
            "/apply/:id",
            get(applications::apply_form)
                .post(applications::apply)
                .layer(upload_limit),
        )
        .route("/applicants/:id", get(applications::applicants))
        .route("/update_status/:app_id/:status", get(applications::update_status))
        .route("/my_applications", get(applications::my_applications))
        .nest_service("/uploads", uploads)
        // Search
        .route("/jobs", get(search::handle_search))
        // Saved jobs
        .route("/save_job/:id", get(saved::save_job))
        .route("/unsave_job/:id", get(saved::unsave_job))
        .route("/saved_jobs", get(saved::saved_jobs))
        // Admin
        .route("/admin", get(admin::overview))
        .route("/toggle_user/:id", get(admin::toggle_user))
        .route("/delete_user/:id", get(admin::delete_user))
        .with_state(state)
}
