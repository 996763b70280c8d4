use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::domain::{CandidateId, OpportunityId};

/// Lifecycle of an application once the candidate has applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    Selected,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Selected => "Selected",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Selected | ApplicationStatus::Rejected
        )
    }

    /// Transitions the backend accepts when recruiters or admins move an application.
    pub const fn can_transition_to(self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (ApplicationStatus::Applied, ApplicationStatus::Shortlisted)
                | (ApplicationStatus::Applied, ApplicationStatus::Rejected)
                | (ApplicationStatus::Shortlisted, ApplicationStatus::Selected)
                | (ApplicationStatus::Shortlisted, ApplicationStatus::Rejected)
        )
    }
}

/// Display color for a status badge; `Accent` defers to the client theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusColor {
    Blue,
    Orange,
    Green,
    Red,
    Accent,
}

pub const fn status_color(status: Option<ApplicationStatus>) -> StatusColor {
    match status {
        Some(ApplicationStatus::Applied) => StatusColor::Blue,
        Some(ApplicationStatus::Shortlisted) => StatusColor::Orange,
        Some(ApplicationStatus::Selected) => StatusColor::Green,
        Some(ApplicationStatus::Rejected) => StatusColor::Red,
        None => StatusColor::Accent,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: &'static str,
    pub color: StatusColor,
}

impl StatusBadge {
    pub const fn for_status(status: Option<ApplicationStatus>) -> Self {
        let label = match status {
            Some(status) => status.label(),
            None => "Not Applied",
        };

        Self {
            label,
            color: status_color(status),
        }
    }
}

/// Client-side read model over statuses owned by the backend.
///
/// The only transition computed here is the optimistic `None -> Applied` after a
/// successful apply call; everything else is recorded as the backend reports it.
#[derive(Debug, Default, Clone)]
pub struct ApplicationTracker {
    statuses: HashMap<(CandidateId, OpportunityId), ApplicationStatus>,
}

impl ApplicationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(
        &self,
        candidate_id: &CandidateId,
        opportunity_id: &OpportunityId,
    ) -> Option<ApplicationStatus> {
        self.statuses
            .get(&(candidate_id.clone(), opportunity_id.clone()))
            .copied()
    }

    /// Returns `false` when a status is already known, leaving it untouched.
    pub fn mark_applied(&mut self, candidate_id: &CandidateId, opportunity_id: &OpportunityId) -> bool {
        let key = (candidate_id.clone(), opportunity_id.clone());
        if self.statuses.contains_key(&key) {
            return false;
        }
        self.statuses.insert(key, ApplicationStatus::Applied);
        true
    }

    pub fn record(
        &mut self,
        candidate_id: &CandidateId,
        opportunity_id: &OpportunityId,
        status: ApplicationStatus,
    ) {
        self.statuses
            .insert((candidate_id.clone(), opportunity_id.clone()), status);
    }

    pub fn badge(&self, candidate_id: &CandidateId, opportunity_id: &OpportunityId) -> StatusBadge {
        StatusBadge::for_status(self.status(candidate_id, opportunity_id))
    }
}
