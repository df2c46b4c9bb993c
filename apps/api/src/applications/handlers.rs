use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::applications::workflow::{check_transition, StatusCounts};
use crate::auth::Caller;
use crate::errors::AppError;
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::jobs::handlers::{load_owned_job, SearchQuery};
use crate::jobs::search::filter_applications;
use crate::models::application::{
    Application, ApplicationStatus, Applicant, CandidateApplication,
};
use crate::models::profile::Role;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

#[derive(Debug, Serialize)]
pub struct CandidateApplicationsResponse {
    pub applications: Vec<CandidateApplication>,
    /// Counts over all of the candidate's applications, ignoring `q`.
    pub counts: StatusCounts,
}

#[derive(Debug, Serialize)]
pub struct ApplicantsResponse {
    pub applications: Vec<Applicant>,
    pub counts: StatusCounts,
}

/// POST /api/v1/jobs/:id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    Extension(caller): Extension<Arc<Caller>>,
    PathParam(job_id): PathParam<Uuid>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let candidate = caller.require_role(Role::Candidate)?;

    state
        .store
        .job(job_id)
        .await?
        .filter(|job| job.is_public)
        .ok_or_else(|| AppError::NotFound("Job not found or is not public".to_string()))?;

    let application = state.store.create_application(candidate.id, job_id).await?;

    info!(
        "Candidate {} applied to job {job_id} (application {})",
        candidate.id, application.id
    );
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/applications
pub async fn handle_list_own_applications(
    State(state): State<AppState>,
    Extension(caller): Extension<Arc<Caller>>,
    QueryParams(params): QueryParams<SearchQuery>,
) -> Result<Json<CandidateApplicationsResponse>, AppError> {
    let candidate = caller.require_role(Role::Candidate)?;

    let applications = state.store.applications_for_candidate(candidate.id).await?;
    let counts = StatusCounts::tally(applications.iter().map(|a| a.application.status));

    Ok(Json(CandidateApplicationsResponse {
        applications: filter_applications(applications, params.q.as_deref()),
        counts,
    }))
}

/// GET /api/v1/jobs/:id/applications
pub async fn handle_list_applicants(
    State(state): State<AppState>,
    Extension(caller): Extension<Arc<Caller>>,
    PathParam(job_id): PathParam<Uuid>,
) -> Result<Json<ApplicantsResponse>, AppError> {
    let recruiter = caller.require_role(Role::Client)?;
    load_owned_job(state.store.as_ref(), job_id, recruiter).await?;

    let applications = state.store.applicants_for_job(job_id).await?;
    let counts = StatusCounts::tally(applications.iter().map(|a| a.application.status));

    Ok(Json(ApplicantsResponse {
        applications,
        counts,
    }))
}

/// PATCH /api/v1/applications/:id/status
///
/// Only the recruiter who owns the application's job may triage it.
pub async fn handle_update_status(
    State(state): State<AppState>,
    Extension(caller): Extension<Arc<Caller>>,
    PathParam(application_id): PathParam<Uuid>,
    JsonBody(update): JsonBody<StatusUpdate>,
) -> Result<Json<Application>, AppError> {
    let recruiter = caller.require_role(Role::Client)?;

    let application = state
        .store
        .application(application_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;

    load_owned_job(state.store.as_ref(), application.job_id, recruiter).await?;
    check_transition(application.status, update.status)?;

    // Lost a race with another update: report against the state we read.
    let updated = state
        .store
        .set_application_status(application_id, application.status, update.status)
        .await?
        .ok_or(AppError::InvalidTransition {
            from: application.status,
            to: update.status,
        })?;

    info!(
        "Recruiter {} moved application {application_id} from {} to {}",
        recruiter.id, application.status, updated.status
    );
    Ok(Json(updated))
}
