use std::sync::Arc;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Extension, Json,
};
use tracing::{info, warn};

use crate::auth::Caller;
use crate::errors::AppError;
use crate::extract::JsonBody;
use crate::models::profile::Role;
use crate::models::resume::Resume;
use crate::resumes::storage::{object_key, ResumeFileKind};
use crate::resumes::validation::{validate_resume, ResumeForm};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::Validation(format!("Invalid upload: {}", err.body_text()))
    }
}

/// GET /api/v1/resume
///
/// `null` until the candidate saves a resume for the first time.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Extension(caller): Extension<Arc<Caller>>,
) -> Result<Json<Option<Resume>>, AppError> {
    let candidate = caller.require_role(Role::Candidate)?;
    Ok(Json(state.store.resume_for_candidate(candidate.id).await?))
}

/// PUT /api/v1/resume
///
/// Creates the candidate's resume (201) or updates it in place (200).
pub async fn handle_save_resume(
    State(state): State<AppState>,
    Extension(caller): Extension<Arc<Caller>>,
    JsonBody(form): JsonBody<ResumeForm>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let candidate = caller.require_role(Role::Candidate)?;
    let draft = validate_resume(form)?;

    let saved = state.store.upsert_resume(candidate.id, &draft).await?;
    let status = if saved.created {
        info!("Created resume {} for candidate {}", saved.resume.id, candidate.id);
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(saved.resume)))
}

/// POST /api/v1/resume/file
///
/// Multipart upload of the resume document (field `file`, PDF/DOC/DOCX).
pub async fn handle_upload_resume_file(
    State(state): State<AppState>,
    Extension(caller): Extension<Arc<Caller>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Resume>, AppError> {
    let candidate = caller.require_role(Role::Candidate)?;
    let mut multipart = multipart?;

    let existing = state
        .store
        .resume_for_candidate(candidate.id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Save your resume before uploading a file".to_string())
        })?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no name".to_string()))?;
        let kind = ResumeFileKind::from_file_name(&file_name).ok_or_else(|| {
            AppError::Validation("Only PDF, DOC and DOCX files are accepted".to_string())
        })?;

        let data = field.bytes().await.map_err(multipart_error)?;
        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        if data.len() > state.config.max_upload_bytes {
            return Err(AppError::PayloadTooLarge);
        }

        let key = object_key(candidate.id, &file_name);
        state.files.put(&key, data, kind.content_type()).await?;

        let resume = state
            .store
            .set_resume_file(candidate.id, &key)
            .await?
            .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;
        info!("Attached {key} to resume {}", resume.id);

        // The replaced document is unreachable once the row points at the new key.
        if let Some(previous) = existing.file_url.filter(|old| *old != key) {
            if let Err(e) = state.files.delete(&previous).await {
                warn!("Could not remove replaced resume file {previous}: {e}");
            }
        }

        return Ok(Json(resume));
    }

    Err(AppError::Validation(format!(
        "Multipart field '{FILE_FIELD}' is required"
    )))
}
