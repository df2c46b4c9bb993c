use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Fixed per profile; drives every access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Candidate,
    /// A recruiter posting jobs on behalf of a hiring company.
    Client,
}

impl Role {
    /// Human wording used in access-denied messages.
    pub fn plural_noun(self) -> &'static str {
        match self {
            Role::Admin => "admins",
            Role::Candidate => "candidates",
            Role::Client => "recruiters",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Admin => "admin",
            Role::Candidate => "candidate",
            Role::Client => "client",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    /// Identity-provider user id; one profile per identity.
    pub user_id: Uuid,
    pub role: Role,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
