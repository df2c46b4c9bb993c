use uuid::Uuid;

use crate::auth::Caller;
use crate::models::job::Job;
use crate::models::profile::Role;

/// Which jobs a listing query may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobScope {
    All,
    PublicOnly,
    OwnedBy(Uuid),
}

impl JobScope {
    /// Recruiters see their own postings, candidates see public ones, admins
    /// see everything. Callers without a profile get the public board.
    pub fn for_caller(caller: &Caller) -> Self {
        match &caller.profile {
            Some(profile) => match profile.role {
                Role::Client => JobScope::OwnedBy(profile.id),
                Role::Candidate => JobScope::PublicOnly,
                Role::Admin => JobScope::All,
            },
            None => JobScope::All,
        }
    }
}

/// Whether `caller` may open the detail page of `job`.
pub fn can_view(job: &Job, caller: &Caller) -> bool {
    if job.is_public {
        return true;
    }
    match &caller.profile {
        Some(profile) => profile.role == Role::Admin || profile.id == job.created_by,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::Profile;
    use chrono::Utc;

    fn caller(role: Role) -> Caller {
        Caller {
            identity: None,
            profile: Some(Profile {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                role,
                full_name: "Test".into(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }),
            access_token: None,
        }
    }

    fn job(owner: Uuid, is_public: bool) -> Job {
        Job {
            id: Uuid::new_v4(),
            title: "Platform Engineer".into(),
            description: "Run the platform".into(),
            thumbnail: None,
            is_public,
            created_by: owner,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_scope_per_role() {
        let recruiter = caller(Role::Client);
        let recruiter_id = recruiter.profile.as_ref().unwrap().id;
        assert_eq!(JobScope::for_caller(&recruiter), JobScope::OwnedBy(recruiter_id));
        assert_eq!(JobScope::for_caller(&caller(Role::Candidate)), JobScope::PublicOnly);
        assert_eq!(JobScope::for_caller(&caller(Role::Admin)), JobScope::All);
        assert_eq!(JobScope::for_caller(&Caller::anonymous()), JobScope::All);
    }

    #[test]
    fn test_private_job_hidden_from_candidates() {
        let private = job(Uuid::new_v4(), false);
        assert!(!can_view(&private, &caller(Role::Candidate)));
        assert!(!can_view(&private, &Caller::anonymous()));
        assert!(can_view(&private, &caller(Role::Admin)));
    }

    #[test]
    fn test_owner_sees_own_private_job() {
        let recruiter = caller(Role::Client);
        let private = job(recruiter.profile.as_ref().unwrap().id, false);
        assert!(can_view(&private, &recruiter));
        assert!(!can_view(&private, &caller(Role::Client)));
    }
}
