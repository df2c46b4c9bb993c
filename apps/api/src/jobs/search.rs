use crate::models::application::CandidateApplication;
use crate::models::job::Job;

/// Case-insensitive substring match against any of `fields`.
/// A blank term matches everything.
pub fn matches_term(fields: &[&str], term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

pub fn filter_jobs(jobs: Vec<Job>, term: Option<&str>) -> Vec<Job> {
    match term {
        Some(term) => jobs
            .into_iter()
            .filter(|j| matches_term(&[j.title.as_str(), j.description.as_str()], term))
            .collect(),
        None => jobs,
    }
}

/// Filters a candidate's applications by the title or description of the job.
pub fn filter_applications(
    applications: Vec<CandidateApplication>,
    term: Option<&str>,
) -> Vec<CandidateApplication> {
    match term {
        Some(term) => applications
            .into_iter()
            .filter(|a| matches_term(&[a.job.title.as_str(), a.job.description.as_str()], term))
            .collect(),
        None => applications,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::{Application, ApplicationStatus};
    use crate::models::job::JobSummary;
    use chrono::Utc;
    use uuid::Uuid;

    fn job(title: &str, description: &str) -> Job {
        Job {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            thumbnail: None,
            is_public: true,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_front_matches_only_frontend() {
        let jobs = vec![
            job("Frontend Developer", "React and TypeScript"),
            job("Backend Developer", "Rust services"),
        ];
        let found = filter_jobs(jobs, Some("front"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Frontend Developer");
    }

    #[test]
    fn test_search_is_case_insensitive_and_covers_description() {
        let jobs = vec![job("Platform Engineer", "Operate our KUBERNETES clusters")];
        assert_eq!(filter_jobs(jobs, Some("kubernetes")).len(), 1);
    }

    #[test]
    fn test_blank_term_keeps_everything() {
        let jobs = vec![job("A", "a"), job("B", "b")];
        assert_eq!(filter_jobs(jobs.clone(), Some("   ")).len(), 2);
        assert_eq!(filter_jobs(jobs, None).len(), 2);
    }

    #[test]
    fn test_no_match_returns_empty() {
        let jobs = vec![job("Frontend Developer", "React")];
        assert!(filter_jobs(jobs, Some("golang")).is_empty());
    }

    fn applied_to(job: &Job) -> CandidateApplication {
        let candidate = Uuid::new_v4();
        CandidateApplication {
            application: Application {
                id: Uuid::new_v4(),
                candidate_id: candidate,
                job_id: job.id,
                status: ApplicationStatus::Pending,
                created_by: candidate,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            job: JobSummary::from(job),
        }
    }

    #[test]
    fn test_applications_filtered_by_job_title() {
        let frontend = job("Frontend Developer", "React and TypeScript");
        let backend = job("Backend Developer", "Rust services");
        let applications = vec![applied_to(&frontend), applied_to(&backend)];

        let found = filter_applications(applications.clone(), Some("FRONT"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].job.id, frontend.id);

        assert_eq!(filter_applications(applications.clone(), Some("rust")).len(), 1);
        assert_eq!(filter_applications(applications, None).len(), 2);
    }
}
