//! Placement eligibility, application intake and status tracking.
//!
//! Every consumer (HTTP router, CLI, catalog reports) goes through the single
//! evaluator in [`eligibility`], fed with profiles normalized by [`intake`].

pub mod domain;
pub mod eligibility;
pub mod intake;
pub mod repository;
pub mod router;
pub mod service;
pub mod status;

#[cfg(test)]
mod tests;

pub use domain::{
    parse_leading_number, CandidateId, CandidateProfile, Compensation, OpportunityId,
    OpportunityRecord, OpportunityType, Slab,
};
pub use eligibility::{
    classify_slab, evaluate, evaluate_payload, is_eligible, is_eligible_payload,
    EligibilityDecision, EligibilityOutcome, EligibilityPredicate, IneligibilityReason,
    PredicateCheck,
};
pub use intake::{
    candidate_from_payload, opportunity_from_payload, CandidatePayload, IntakeViolation,
    NumericValue, OneOrMany, OpportunityPayload,
};
pub use repository::{
    ApplicationRecord, ApplicationStatusView, NotificationError, NotificationPublisher,
    PlacementNotification, PlacementRepository, RepositoryError,
};
pub use router::placement_router;
pub use service::{OpportunityListing, PlacementService, PlacementServiceError};
pub use status::{status_color, ApplicationStatus, ApplicationTracker, StatusBadge, StatusColor};
