//! Persistence seam. Handlers talk to `Arc<dyn Store>`; production uses
//! `PgStore`, tests use the in-memory store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::visibility::JobScope;
use crate::models::application::{
    Application, ApplicationStatus, Applicant, CandidateApplication,
};
use crate::models::job::{Job, JobDraft};
use crate::models::profile::Profile;
use crate::models::resume::{Resume, ResumeDraft};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

/// Outcome of a resume save: the stored row and whether it was newly created.
#[derive(Debug, Clone)]
pub struct SavedResume {
    pub resume: Resume,
    pub created: bool,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Zero rows is `Ok(None)`, never an error.
    async fn profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, AppError>;

    /// Jobs within `scope`, newest first.
    async fn list_jobs(&self, scope: JobScope) -> Result<Vec<Job>, AppError>;
    async fn job(&self, id: Uuid) -> Result<Option<Job>, AppError>;
    async fn create_job(&self, owner: Uuid, draft: &JobDraft) -> Result<Job, AppError>;
    async fn update_job(&self, id: Uuid, draft: &JobDraft) -> Result<Option<Job>, AppError>;
    /// Deletes the job and its applications atomically.
    /// Returns the number of applications removed.
    async fn delete_job(&self, id: Uuid) -> Result<u64, AppError>;

    /// Fails with `AppError::DuplicateApplication` if the pair already exists.
    async fn create_application(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<Application, AppError>;
    async fn application(&self, id: Uuid) -> Result<Option<Application>, AppError>;
    async fn application_for_job(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>, AppError>;
    /// Compare-and-set: only updates while the row is still in `from`.
    async fn set_application_status(
        &self,
        id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Option<Application>, AppError>;
    async fn applications_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<CandidateApplication>, AppError>;
    async fn applicants_for_job(&self, job_id: Uuid) -> Result<Vec<Applicant>, AppError>;

    async fn resume_for_candidate(&self, candidate_id: Uuid) -> Result<Option<Resume>, AppError>;
    /// Single-statement insert-or-update keyed by candidate.
    async fn upsert_resume(
        &self,
        candidate_id: Uuid,
        draft: &ResumeDraft,
    ) -> Result<SavedResume, AppError>;
    async fn set_resume_file(
        &self,
        candidate_id: Uuid,
        file_url: &str,
    ) -> Result<Option<Resume>, AppError>;
}
