use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CandidateId, CandidateProfile, OpportunityId, OpportunityRecord};
use super::status::{ApplicationStatus, StatusBadge, StatusColor};

/// Repository record for a candidate's application to one opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub candidate_id: CandidateId,
    pub opportunity_id: OpportunityId,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRecord {
    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView::from_status(
            self.candidate_id.clone(),
            self.opportunity_id.clone(),
            Some(self.status),
            Some(self.applied_at),
        )
    }
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationStatusView {
    pub candidate_id: CandidateId,
    pub opportunity_id: OpportunityId,
    pub status: Option<ApplicationStatus>,
    pub label: &'static str,
    pub color: StatusColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
}

impl ApplicationStatusView {
    pub fn not_applied(candidate_id: CandidateId, opportunity_id: OpportunityId) -> Self {
        Self::from_status(candidate_id, opportunity_id, None, None)
    }

    fn from_status(
        candidate_id: CandidateId,
        opportunity_id: OpportunityId,
        status: Option<ApplicationStatus>,
        applied_at: Option<DateTime<Utc>>,
    ) -> Self {
        let badge = StatusBadge::for_status(status);
        Self {
            candidate_id,
            opportunity_id,
            status,
            label: badge.label,
            color: badge.color,
            applied_at,
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait PlacementRepository: Send + Sync {
    fn upsert_candidate(&self, profile: CandidateProfile) -> Result<(), RepositoryError>;
    fn candidate(&self, id: &CandidateId) -> Result<Option<CandidateProfile>, RepositoryError>;
    fn upsert_opportunity(&self, record: OpportunityRecord) -> Result<(), RepositoryError>;
    fn opportunity(&self, id: &OpportunityId)
        -> Result<Option<OpportunityRecord>, RepositoryError>;
    fn opportunities(&self) -> Result<Vec<OpportunityRecord>, RepositoryError>;
    fn insert_application(
        &self,
        record: ApplicationRecord,
    ) -> Result<ApplicationRecord, RepositoryError>;
    fn update_application(&self, record: ApplicationRecord) -> Result<(), RepositoryError>;
    fn application(
        &self,
        candidate_id: &CandidateId,
        opportunity_id: &OpportunityId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn applications_for(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound push-notification hook (e.g., a mobile gateway adapter).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: PlacementNotification) -> Result<(), NotificationError>;
}

/// Simple notification payload so routes/tests can assert integration boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementNotification {
    pub template: String,
    pub candidate_id: CandidateId,
    pub opportunity_id: OpportunityId,
    pub details: BTreeMap<String, String>,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
