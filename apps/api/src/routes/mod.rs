pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::auth::handlers as auth;
use crate::auth::middleware::authenticate;
use crate::jobs::handlers as jobs;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 16 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes + MULTIPART_OVERHEAD);

    let api = Router::new()
        .route("/auth/sign-out", post(auth::handle_sign_out))
        .route("/me", get(auth::handle_me))
        // Job board
        .route(
            "/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Applications
        .route("/jobs/:id/apply", post(applications::handle_apply))
        .route(
            "/jobs/:id/applications",
            get(applications::handle_list_applicants),
        )
        .route(
            "/applications",
            get(applications::handle_list_own_applications),
        )
        .route(
            "/applications/:id/status",
            patch(applications::handle_update_status),
        )
        // Resume
        .route(
            "/resume",
            get(resumes::handle_get_resume).put(resumes::handle_save_resume),
        )
        .route(
            "/resume/file",
            post(resumes::handle_upload_resume_file).layer(upload_limit),
        )
        .route_layer(from_fn_with_state(state.clone(), authenticate))
        // Sign-in is the one API route that never needs a token.
        .route("/auth/sign-in", post(auth::handle_sign_in));

    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api/v1", api)
        .with_state(state)
}
