use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub is_public: bool,
    /// Owning recruiter's profile id.
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for creating or editing a job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub is_public: bool,
}

/// The slice of a job shown next to a candidate's application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: Uuid,
    pub title: String,
    pub thumbnail: Option<String>,
    pub description: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        JobSummary {
            id: job.id,
            title: job.title.clone(),
            thumbnail: job.thumbnail.clone(),
            description: job.description.clone(),
            is_public: job.is_public,
            created_at: job.created_at,
        }
    }
}
