//! In-memory `Store` used by handler tests. Mirrors the database constraints:
//! one application per (candidate, job), one resume per candidate, cascade on
//! job delete.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::visibility::JobScope;
use crate::models::application::{
    Application, ApplicationStatus, Applicant, CandidateApplication,
};
use crate::models::job::{Job, JobDraft, JobSummary};
use crate::models::profile::{Profile, Role};
use crate::models::resume::{Resume, ResumeDraft};
use crate::store::{SavedResume, Store};

#[derive(Default)]
struct Tables {
    profiles: Vec<Profile>,
    jobs: Vec<Job>,
    applications: Vec<Application>,
    resumes: Vec<Resume>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

/// Timestamps strictly increase, at Postgres' microsecond resolution.
fn tick(after: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(after + Duration::microseconds(1))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_profile(&self, user_id: Uuid, role: Role, full_name: &str) -> Profile {
        let now = Utc::now();
        let profile = Profile {
            id: Uuid::new_v4(),
            user_id,
            role,
            full_name: full_name.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().profiles.push(profile.clone());
        profile
    }

    pub fn application_count(&self) -> usize {
        self.tables.lock().unwrap().applications.len()
    }

    pub fn resume_count(&self) -> usize {
        self.tables.lock().unwrap().resumes.len()
    }

    fn latest_created(tables: &Tables) -> DateTime<Utc> {
        tables
            .jobs
            .iter()
            .map(|j| j.created_at)
            .chain(tables.applications.iter().map(|a| a.created_at))
            .max()
            .unwrap_or_else(Utc::now)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn list_jobs(&self, scope: JobScope) -> Result<Vec<Job>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut jobs: Vec<Job> = tables
            .jobs
            .iter()
            .filter(|job| match scope {
                JobScope::All => true,
                JobScope::PublicOnly => job.is_public,
                JobScope::OwnedBy(owner) => job.created_by == owner,
            })
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn job(&self, id: Uuid) -> Result<Option<Job>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn create_job(&self, owner: Uuid, draft: &JobDraft) -> Result<Job, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let now = tick(Self::latest_created(&tables));
        let job = Job {
            id: Uuid::new_v4(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            thumbnail: draft.thumbnail.clone(),
            is_public: draft.is_public,
            created_by: owner,
            created_at: now,
            updated_at: now,
        };
        tables.jobs.push(job.clone());
        Ok(job)
    }

    async fn update_job(&self, id: Uuid, draft: &JobDraft) -> Result<Option<Job>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(job) = tables.jobs.iter_mut().find(|j| j.id == id) else {
            return Ok(None);
        };
        job.title = draft.title.clone();
        job.description = draft.description.clone();
        job.thumbnail = draft.thumbnail.clone();
        job.is_public = draft.is_public;
        job.updated_at = tick(job.updated_at);
        Ok(Some(job.clone()))
    }

    async fn delete_job(&self, id: Uuid) -> Result<u64, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.applications.len();
        tables.applications.retain(|a| a.job_id != id);
        let removed = (before - tables.applications.len()) as u64;
        tables.jobs.retain(|j| j.id != id);
        Ok(removed)
    }

    async fn create_application(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<Application, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .applications
            .iter()
            .any(|a| a.candidate_id == candidate_id && a.job_id == job_id)
        {
            return Err(AppError::DuplicateApplication);
        }
        let now = tick(Self::latest_created(&tables));
        let application = Application {
            id: Uuid::new_v4(),
            candidate_id,
            job_id,
            status: ApplicationStatus::Pending,
            created_by: candidate_id,
            created_at: now,
            updated_at: now,
        };
        tables.applications.push(application.clone());
        Ok(application)
    }

    async fn application(&self, id: Uuid) -> Result<Option<Application>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn application_for_job(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .applications
            .iter()
            .find(|a| a.candidate_id == candidate_id && a.job_id == job_id)
            .cloned())
    }

    async fn set_application_status(
        &self,
        id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Option<Application>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(application) = tables
            .applications
            .iter_mut()
            .find(|a| a.id == id && a.status == from)
        else {
            return Ok(None);
        };
        application.status = to;
        application.updated_at = tick(application.updated_at);
        Ok(Some(application.clone()))
    }

    async fn applications_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<CandidateApplication>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<CandidateApplication> = tables
            .applications
            .iter()
            .filter(|a| a.candidate_id == candidate_id)
            .filter_map(|a| {
                let job = tables.jobs.iter().find(|j| j.id == a.job_id)?;
                Some(CandidateApplication {
                    application: a.clone(),
                    job: JobSummary::from(job),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.application.created_at.cmp(&a.application.created_at));
        Ok(rows)
    }

    async fn applicants_for_job(&self, job_id: Uuid) -> Result<Vec<Applicant>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<Applicant> = tables
            .applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .filter_map(|a| {
                let profile = tables.profiles.iter().find(|p| p.id == a.candidate_id)?;
                Some(Applicant {
                    application: a.clone(),
                    candidate_name: profile.full_name.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.application.created_at.cmp(&a.application.created_at));
        Ok(rows)
    }

    async fn resume_for_candidate(&self, candidate_id: Uuid) -> Result<Option<Resume>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .resumes
            .iter()
            .find(|r| r.candidate_id == candidate_id)
            .cloned())
    }

    async fn upsert_resume(
        &self,
        candidate_id: Uuid,
        draft: &ResumeDraft,
    ) -> Result<SavedResume, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(resume) = tables
            .resumes
            .iter_mut()
            .find(|r| r.candidate_id == candidate_id)
        {
            resume.title = draft.title.clone();
            resume.summary = draft.summary.clone();
            resume.experience = draft.experience.clone();
            resume.education = draft.education.clone();
            resume.skills = draft.skills.clone();
            resume.contact = draft.contact.clone();
            resume.updated_at = tick(resume.updated_at);
            return Ok(SavedResume {
                resume: resume.clone(),
                created: false,
            });
        }

        let now = Utc::now();
        let resume = Resume {
            id: Uuid::new_v4(),
            candidate_id,
            title: draft.title.clone(),
            summary: draft.summary.clone(),
            experience: draft.experience.clone(),
            education: draft.education.clone(),
            skills: draft.skills.clone(),
            contact: draft.contact.clone(),
            file_url: None,
            created_by: candidate_id,
            created_at: now,
            updated_at: now,
        };
        tables.resumes.push(resume.clone());
        Ok(SavedResume {
            resume,
            created: true,
        })
    }

    async fn set_resume_file(
        &self,
        candidate_id: Uuid,
        file_url: &str,
    ) -> Result<Option<Resume>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(resume) = tables
            .resumes
            .iter_mut()
            .find(|r| r.candidate_id == candidate_id)
        else {
            return Ok(None);
        };
        resume.file_url = Some(file_url.to_string());
        resume.updated_at = tick(resume.updated_at);
        Ok(Some(resume.clone()))
    }
}
