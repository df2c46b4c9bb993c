use serde::Serialize;

use crate::errors::AppError;
use crate::models::application::ApplicationStatus;

impl ApplicationStatus {
    /// `pending` is the only state with outgoing edges; `shortlisted` and
    /// `rejected` are terminal.
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (ApplicationStatus::Pending, ApplicationStatus::Shortlisted)
                | (ApplicationStatus::Pending, ApplicationStatus::Rejected)
        )
    }
}

pub fn check_transition(from: ApplicationStatus, to: ApplicationStatus) -> Result<(), AppError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(AppError::InvalidTransition { from, to })
    }
}

/// Per-status tally shown above application lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub shortlisted: usize,
    pub rejected: usize,
    pub total: usize,
}

impl StatusCounts {
    pub fn tally<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = ApplicationStatus>,
    {
        statuses
            .into_iter()
            .fold(StatusCounts::default(), |mut counts, status| {
                match status {
                    ApplicationStatus::Pending => counts.pending += 1,
                    ApplicationStatus::Shortlisted => counts.shortlisted += 1,
                    ApplicationStatus::Rejected => counts.rejected += 1,
                }
                counts.total += 1;
                counts
            })
    }
}
