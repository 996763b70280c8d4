use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{
    CandidateId, CandidateProfile, OpportunityId, OpportunityRecord, OpportunityType,
};
use super::eligibility::{evaluate, EligibilityOutcome, IneligibilityReason};
use super::intake::{
    candidate_from_payload, opportunity_from_payload, CandidatePayload, IntakeViolation,
    OpportunityPayload,
};
use super::repository::{
    ApplicationRecord, ApplicationStatusView, NotificationPublisher, PlacementNotification,
    PlacementRepository, RepositoryError,
};
use super::status::{ApplicationStatus, StatusBadge};

/// Opportunity as shown to one candidate: posting summary, eligibility and status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityListing {
    pub opportunity_id: OpportunityId,
    pub company_name: String,
    pub role: String,
    pub opportunity_type: OpportunityType,
    pub ctc: String,
    pub stipend: String,
    pub eligible: bool,
    pub eligibility: String,
    pub badge: StatusBadge,
}

/// Service composing intake normalization, the eligibility evaluator, storage and notifications.
pub struct PlacementService<R, N> {
    repository: Arc<R>,
    notifications: Arc<N>,
}

impl<R, N> PlacementService<R, N>
where
    R: PlacementRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(repository: Arc<R>, notifications: Arc<N>) -> Self {
        Self {
            repository,
            notifications,
        }
    }

    /// Normalize and store a candidate profile, replacing any previous version.
    pub fn register_candidate(
        &self,
        candidate_id: CandidateId,
        payload: &CandidatePayload,
    ) -> Result<CandidateProfile, PlacementServiceError> {
        let profile = candidate_from_payload(candidate_id, payload)?;
        self.repository.upsert_candidate(profile.clone())?;
        debug!(candidate_id = %profile.candidate_id, "candidate profile stored");
        Ok(profile)
    }

    /// Normalize and store an opportunity, replacing any previous version.
    pub fn publish_opportunity(
        &self,
        opportunity_id: OpportunityId,
        payload: &OpportunityPayload,
    ) -> Result<OpportunityRecord, PlacementServiceError> {
        let record = opportunity_from_payload(opportunity_id, payload)?;
        self.repository.upsert_opportunity(record.clone())?;
        info!(
            opportunity_id = %record.opportunity_id,
            company = %record.company_name,
            opportunity_type = %record.opportunity_type,
            "opportunity published"
        );
        Ok(record)
    }

    /// Store already-normalized opportunities, e.g. from a catalog import.
    pub fn load_opportunities(
        &self,
        records: Vec<OpportunityRecord>,
    ) -> Result<usize, PlacementServiceError> {
        let count = records.len();
        for record in records {
            self.repository.upsert_opportunity(record)?;
        }
        info!(count, "opportunity catalog loaded");
        Ok(count)
    }

    pub fn eligibility(
        &self,
        candidate_id: &CandidateId,
        opportunity_id: &OpportunityId,
    ) -> Result<EligibilityOutcome, PlacementServiceError> {
        let candidate = self.candidate(candidate_id)?;
        let opportunity = self.opportunity(opportunity_id)?;
        Ok(evaluate(&candidate, &opportunity))
    }

    /// Every posting with the candidate's eligibility and application badge.
    pub fn listings(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<OpportunityListing>, PlacementServiceError> {
        let candidate = self.candidate(candidate_id)?;
        let applications: BTreeMap<OpportunityId, ApplicationStatus> = self
            .repository
            .applications_for(candidate_id)?
            .into_iter()
            .map(|record| (record.opportunity_id, record.status))
            .collect();

        let mut listings: Vec<OpportunityListing> = self
            .repository
            .opportunities()?
            .into_iter()
            .map(|opportunity| {
                let outcome = evaluate(&candidate, &opportunity);
                let status = applications.get(&opportunity.opportunity_id).copied();
                OpportunityListing {
                    eligible: outcome.is_eligible(),
                    eligibility: outcome.decision.summary(),
                    badge: StatusBadge::for_status(status),
                    opportunity_id: opportunity.opportunity_id,
                    company_name: opportunity.company_name,
                    role: opportunity.role,
                    opportunity_type: opportunity.opportunity_type,
                    ctc: opportunity.ctc.label,
                    stipend: opportunity.stipend.label,
                }
            })
            .collect();
        listings.sort_by(|a, b| a.opportunity_id.cmp(&b.opportunity_id));

        Ok(listings)
    }

    /// Confirm eligibility, then record the application as `Applied`.
    pub fn apply(
        &self,
        candidate_id: &CandidateId,
        opportunity_id: &OpportunityId,
    ) -> Result<ApplicationRecord, PlacementServiceError> {
        let outcome = self.eligibility(candidate_id, opportunity_id)?;

        if !outcome.is_eligible() {
            let summary = outcome.decision.summary();
            info!(%candidate_id, %opportunity_id, %summary, "application refused");
            return Err(PlacementServiceError::Ineligible {
                candidate_id: candidate_id.clone(),
                opportunity_id: opportunity_id.clone(),
                summary,
                reasons: outcome.decision.reasons().to_vec(),
            });
        }

        let now = Utc::now();
        let record = ApplicationRecord {
            candidate_id: candidate_id.clone(),
            opportunity_id: opportunity_id.clone(),
            status: ApplicationStatus::Applied,
            applied_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert_application(record)?;
        info!(%candidate_id, %opportunity_id, "application recorded");

        self.notify(&stored, "application_received");
        Ok(stored)
    }

    /// Move an application along its lifecycle on behalf of a recruiter or admin.
    pub fn update_status(
        &self,
        candidate_id: &CandidateId,
        opportunity_id: &OpportunityId,
        status: ApplicationStatus,
    ) -> Result<ApplicationRecord, PlacementServiceError> {
        let mut record = self
            .repository
            .application(candidate_id, opportunity_id)?
            .ok_or_else(|| PlacementServiceError::NotApplied {
                candidate_id: candidate_id.clone(),
                opportunity_id: opportunity_id.clone(),
            })?;

        if !record.status.can_transition_to(status) {
            return Err(PlacementServiceError::InvalidTransition {
                from: record.status,
                to: status,
            });
        }

        let previous = record.status;
        record.status = status;
        record.updated_at = Utc::now();
        self.repository.update_application(record.clone())?;
        info!(
            %candidate_id,
            %opportunity_id,
            from = previous.label(),
            to = status.label(),
            "application status changed"
        );

        self.notify(&record, "application_status_changed");
        Ok(record)
    }

    /// Current status, or the not-applied view when no application exists.
    pub fn status(
        &self,
        candidate_id: &CandidateId,
        opportunity_id: &OpportunityId,
    ) -> Result<ApplicationStatusView, PlacementServiceError> {
        let view = match self.repository.application(candidate_id, opportunity_id)? {
            Some(record) => record.status_view(),
            None => ApplicationStatusView::not_applied(candidate_id.clone(), opportunity_id.clone()),
        };
        Ok(view)
    }

    fn candidate(&self, id: &CandidateId) -> Result<CandidateProfile, PlacementServiceError> {
        self.repository
            .candidate(id)?
            .ok_or_else(|| PlacementServiceError::UnknownCandidate(id.clone()))
    }

    fn opportunity(&self, id: &OpportunityId) -> Result<OpportunityRecord, PlacementServiceError> {
        self.repository
            .opportunity(id)?
            .ok_or_else(|| PlacementServiceError::UnknownOpportunity(id.clone()))
    }

    /// The record is already stored; a failed publish only loses the push.
    fn notify(&self, record: &ApplicationRecord, template: &str) {
        let mut details = BTreeMap::new();
        details.insert("status".to_string(), record.status.label().to_string());
        let published = self.notifications.publish(PlacementNotification {
            template: template.to_string(),
            candidate_id: record.candidate_id.clone(),
            opportunity_id: record.opportunity_id.clone(),
            details,
        });

        if let Err(error) = published {
            warn!(
                candidate_id = %record.candidate_id,
                opportunity_id = %record.opportunity_id,
                template,
                %error,
                "placement notification not delivered"
            );
        }
    }
}

/// Error raised by the placement service.
#[derive(Debug, thiserror::Error)]
pub enum PlacementServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("unknown candidate {0}")]
    UnknownCandidate(CandidateId),
    #[error("unknown opportunity {0}")]
    UnknownOpportunity(OpportunityId),
    #[error("candidate {candidate_id} cannot apply to {opportunity_id}: {summary}")]
    Ineligible {
        candidate_id: CandidateId,
        opportunity_id: OpportunityId,
        summary: String,
        reasons: Vec<IneligibilityReason>,
    },
    #[error("application cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error("candidate {candidate_id} has not applied to {opportunity_id}")]
    NotApplied {
        candidate_id: CandidateId,
        opportunity_id: OpportunityId,
    },
}
