// Job board: role-scoped listing, search, detail, and recruiter job management.

pub mod handlers;
pub mod search;
pub mod validation;
pub mod visibility;
