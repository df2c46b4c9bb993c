// Candidate resume: one row per candidate, plus an uploaded document in object storage.

pub mod handlers;
pub mod storage;
pub mod validation;
