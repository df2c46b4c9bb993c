use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::Caller;
use crate::errors::AppError;
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::jobs::search::filter_jobs;
use crate::jobs::validation::{validate_job, JobForm};
use crate::jobs::visibility::{can_view, JobScope};
use crate::models::application::Application;
use crate::models::job::Job;
use crate::models::profile::{Profile, Role};
use crate::state::AppState;
use crate::store::Store;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    pub job: Job,
    /// The calling candidate's application for this job, if any.
    pub application: Option<Application>,
}

#[derive(Debug, Serialize)]
pub struct DeleteJobResponse {
    pub deleted: Uuid,
    pub applications_removed: u64,
}

/// Loads a job the recruiter owns. Missing → 404, someone else's → 403.
pub async fn load_owned_job(
    store: &dyn Store,
    job_id: Uuid,
    owner: &Profile,
) -> Result<Job, AppError> {
    let job = store
        .job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    if job.created_by != owner.id {
        return Err(AppError::Forbidden(
            "You do not have permission to manage this job".to_string(),
        ));
    }
    Ok(job)
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Extension(caller): Extension<Arc<Caller>>,
    QueryParams(params): QueryParams<SearchQuery>,
) -> Result<Json<Vec<Job>>, AppError> {
    let scope = JobScope::for_caller(&caller);
    let jobs = state.store.list_jobs(scope).await?;
    Ok(Json(filter_jobs(jobs, params.q.as_deref())))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Extension(caller): Extension<Arc<Caller>>,
    PathParam(job_id): PathParam<Uuid>,
) -> Result<Json<JobDetailResponse>, AppError> {
    let job = state
        .store
        .job(job_id)
        .await?
        .filter(|job| can_view(job, &caller))
        .ok_or_else(|| AppError::NotFound("Job not found or is not public".to_string()))?;

    let application = match &caller.profile {
        Some(profile) if profile.role == Role::Candidate => {
            state.store.application_for_job(profile.id, job.id).await?
        }
        _ => None,
    };

    Ok(Json(JobDetailResponse { job, application }))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Extension(caller): Extension<Arc<Caller>>,
    JsonBody(form): JsonBody<JobForm>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let recruiter = caller.require_role(Role::Client)?;
    let draft = validate_job(form)?;
    let job = state.store.create_job(recruiter.id, &draft).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// PUT /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Extension(caller): Extension<Arc<Caller>>,
    PathParam(job_id): PathParam<Uuid>,
    JsonBody(form): JsonBody<JobForm>,
) -> Result<Json<Job>, AppError> {
    let recruiter = caller.require_role(Role::Client)?;
    let draft = validate_job(form)?;
    load_owned_job(state.store.as_ref(), job_id, recruiter).await?;

    let job = state
        .store
        .update_job(job_id, &draft)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    info!("Recruiter {} updated job {job_id}", recruiter.id);
    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:id
///
/// Removes the job together with every application to it.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Extension(caller): Extension<Arc<Caller>>,
    PathParam(job_id): PathParam<Uuid>,
) -> Result<Json<DeleteJobResponse>, AppError> {
    let recruiter = caller.require_role(Role::Client)?;
    load_owned_job(state.store.as_ref(), job_id, recruiter).await?;

    let applications_removed = state.store.delete_job(job_id).await?;

    Ok(Json(DeleteJobResponse {
        deleted: job_id,
        applications_removed,
    }))
}
