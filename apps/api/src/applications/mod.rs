// Application workflow: candidates apply, recruiters triage.

pub mod handlers;
pub mod workflow;
