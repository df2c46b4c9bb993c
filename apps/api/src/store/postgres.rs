use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::visibility::JobScope;
use crate::models::application::{
    Application, ApplicationStatus, Applicant, CandidateApplication,
};
use crate::models::job::{Job, JobDraft, JobSummary};
use crate::models::profile::Profile;
use crate::models::resume::{Resume, ResumeDraft};
use crate::store::{SavedResume, Store};

const APPLICATIONS_UNIQUE: &str = "applications_candidate_job_key";

/// `Store` backed by the PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Flat row for the candidate application list join.
#[derive(FromRow)]
struct CandidateApplicationRow {
    id: Uuid,
    candidate_id: Uuid,
    job_id: Uuid,
    status: ApplicationStatus,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    job_title: String,
    job_thumbnail: Option<String>,
    job_description: String,
    job_is_public: bool,
    job_created_at: DateTime<Utc>,
}

impl From<CandidateApplicationRow> for CandidateApplication {
    fn from(row: CandidateApplicationRow) -> Self {
        CandidateApplication {
            application: Application {
                id: row.id,
                candidate_id: row.candidate_id,
                job_id: row.job_id,
                status: row.status,
                created_by: row.created_by,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            job: JobSummary {
                id: row.job_id,
                title: row.job_title,
                thumbnail: row.job_thumbnail,
                description: row.job_description,
                is_public: row.job_is_public,
                created_at: row.job_created_at,
            },
        }
    }
}

#[derive(FromRow)]
struct UpsertedResume {
    #[sqlx(flatten)]
    resume: Resume,
    inserted: bool,
}

fn is_duplicate_application(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            db.is_unique_violation() && db.constraint() == Some(APPLICATIONS_UNIQUE)
        }
        _ => false,
    }
}

#[async_trait]
impl Store for PgStore {
    async fn profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        Ok(
            sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_jobs(&self, scope: JobScope) -> Result<Vec<Job>, AppError> {
        let query = match scope {
            JobScope::All => {
                sqlx::query_as::<_, Job>("SELECT * FROM jobs ORDER BY created_at DESC")
            }
            JobScope::PublicOnly => sqlx::query_as::<_, Job>(
                "SELECT * FROM jobs WHERE is_public ORDER BY created_at DESC",
            ),
            JobScope::OwnedBy(owner) => sqlx::query_as::<_, Job>(
                "SELECT * FROM jobs WHERE created_by = $1 ORDER BY created_at DESC",
            )
            .bind(owner),
        };
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn job(&self, id: Uuid) -> Result<Option<Job>, AppError> {
        Ok(sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_job(&self, owner: Uuid, draft: &JobDraft) -> Result<Job, AppError> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (title, description, thumbnail, is_public, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.thumbnail)
        .bind(draft.is_public)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        info!("Created job {} for recruiter {owner}", job.id);
        Ok(job)
    }

    async fn update_job(&self, id: Uuid, draft: &JobDraft) -> Result<Option<Job>, AppError> {
        Ok(sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET title = $2, description = $3, thumbnail = $4, is_public = $5,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.thumbnail)
        .bind(draft.is_public)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_job(&self, id: Uuid) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM applications WHERE job_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("Deleted job {id} and {removed} application(s)");
        Ok(removed)
    }

    async fn create_application(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<Application, AppError> {
        sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (candidate_id, job_id, status, created_by)
            VALUES ($1, $2, 'pending', $1)
            RETURNING *
            "#,
        )
        .bind(candidate_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_duplicate_application(&e) {
                AppError::DuplicateApplication
            } else {
                AppError::Database(e)
            }
        })
    }

    async fn application(&self, id: Uuid) -> Result<Option<Application>, AppError> {
        Ok(
            sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn application_for_job(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>, AppError> {
        Ok(sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE candidate_id = $1 AND job_id = $2",
        )
        .bind(candidate_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn set_application_status(
        &self,
        id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Option<Application>, AppError> {
        Ok(sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET status = $3, updated_at = now()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn applications_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<CandidateApplication>, AppError> {
        let rows = sqlx::query_as::<_, CandidateApplicationRow>(
            r#"
            SELECT a.id, a.candidate_id, a.job_id, a.status, a.created_by,
                   a.created_at, a.updated_at,
                   j.title AS job_title, j.thumbnail AS job_thumbnail,
                   j.description AS job_description, j.is_public AS job_is_public,
                   j.created_at AS job_created_at
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            WHERE a.candidate_id = $1
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CandidateApplication::from).collect())
    }

    async fn applicants_for_job(&self, job_id: Uuid) -> Result<Vec<Applicant>, AppError> {
        Ok(sqlx::query_as::<_, Applicant>(
            r#"
            SELECT a.*, p.full_name AS candidate_name
            FROM applications a
            JOIN profiles p ON p.id = a.candidate_id
            WHERE a.job_id = $1
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn resume_for_candidate(&self, candidate_id: Uuid) -> Result<Option<Resume>, AppError> {
        Ok(
            sqlx::query_as::<_, Resume>("SELECT * FROM resumes WHERE candidate_id = $1")
                .bind(candidate_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn upsert_resume(
        &self,
        candidate_id: Uuid,
        draft: &ResumeDraft,
    ) -> Result<SavedResume, AppError> {
        // xmax is zero only for a freshly inserted tuple.
        let row = sqlx::query_as::<_, UpsertedResume>(
            r#"
            INSERT INTO resumes
                (candidate_id, title, summary, experience, education, skills, contact, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $1)
            ON CONFLICT (candidate_id) DO UPDATE
            SET title = EXCLUDED.title,
                summary = EXCLUDED.summary,
                experience = EXCLUDED.experience,
                education = EXCLUDED.education,
                skills = EXCLUDED.skills,
                contact = EXCLUDED.contact,
                updated_at = now()
            RETURNING *, (xmax = 0) AS inserted
            "#,
        )
        .bind(candidate_id)
        .bind(&draft.title)
        .bind(&draft.summary)
        .bind(&draft.experience)
        .bind(&draft.education)
        .bind(&draft.skills)
        .bind(&draft.contact)
        .fetch_one(&self.pool)
        .await?;

        Ok(SavedResume {
            resume: row.resume,
            created: row.inserted,
        })
    }

    async fn set_resume_file(
        &self,
        candidate_id: Uuid,
        file_url: &str,
    ) -> Result<Option<Resume>, AppError> {
        Ok(sqlx::query_as::<_, Resume>(
            r#"
            UPDATE resumes
            SET file_url = $2, updated_at = now()
            WHERE candidate_id = $1
            RETURNING *
            "#,
        )
        .bind(candidate_id)
        .bind(file_url)
        .fetch_optional(&self.pool)
        .await?)
    }
}
