use serde::Deserialize;

use crate::errors::AppError;
use crate::models::job::JobDraft;

/// Create/edit body as submitted.
#[derive(Debug, Deserialize)]
pub struct JobForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub thumbnail: Option<String>,
    pub is_public: Option<bool>,
}

/// Trims fields and rejects blanks before anything reaches the store.
pub fn validate_job(form: JobForm) -> Result<JobDraft, AppError> {
    let title = form.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Job title is required".to_string()));
    }
    let description = form.description.trim();
    if description.is_empty() {
        return Err(AppError::Validation(
            "Job description is required".to_string(),
        ));
    }

    Ok(JobDraft {
        title: title.to_string(),
        description: description.to_string(),
        thumbnail: non_blank(form.thumbnail),
        is_public: form.is_public.unwrap_or(true),
    })
}

/// `Some("  ")` and `None` both become `None`; other values are trimmed.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
