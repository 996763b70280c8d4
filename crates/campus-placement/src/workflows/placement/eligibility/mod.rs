mod policy;
mod rules;
pub mod slab;

pub use policy::{EligibilityDecision, IneligibilityReason};
pub use slab::classify_slab;

use super::domain::{
    CandidateId, CandidateProfile, OpportunityId, OpportunityRecord, OpportunityType,
};
use super::intake::{
    candidate_from_payload, opportunity_from_payload, CandidatePayload, OpportunityPayload,
};
use policy::decide_outcome;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Predicates combined into an eligibility decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityPredicate {
    Branch,
    Batch,
    Cgpa,
    Internship,
    FullTime,
}

/// One evaluated predicate, kept so a decision can be explained afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredicateCheck {
    pub predicate: EligibilityPredicate,
    pub passed: bool,
    /// Whether the posting's type makes this predicate mandatory.
    pub required: bool,
    pub notes: String,
}

/// Evaluation output describing the decision and the predicate trail behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityOutcome {
    pub candidate_id: CandidateId,
    pub opportunity_id: OpportunityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opportunity_type: Option<OpportunityType>,
    pub decision: EligibilityDecision,
    pub checks: Vec<PredicateCheck>,
}

impl EligibilityOutcome {
    pub fn is_eligible(&self) -> bool {
        self.decision.is_eligible()
    }

    fn invalid(candidate_id: CandidateId, opportunity_id: OpportunityId, detail: String) -> Self {
        Self {
            candidate_id,
            opportunity_id,
            opportunity_type: None,
            decision: EligibilityDecision::Ineligible {
                reasons: vec![IneligibilityReason::InvalidData { detail }],
            },
            checks: Vec::new(),
        }
    }
}

/// Evaluate a candidate against a posting, keeping the full predicate trail.
pub fn evaluate(candidate: &CandidateProfile, opportunity: &OpportunityRecord) -> EligibilityOutcome {
    let (checks, signals) = rules::check_predicates(candidate, opportunity);
    let decision = decide_outcome(candidate, opportunity, &signals);

    EligibilityOutcome {
        candidate_id: candidate.candidate_id.clone(),
        opportunity_id: opportunity.opportunity_id.clone(),
        opportunity_type: Some(opportunity.opportunity_type),
        decision,
        checks,
    }
}

pub fn is_eligible(candidate: &CandidateProfile, opportunity: &OpportunityRecord) -> bool {
    evaluate(candidate, opportunity).is_eligible()
}

/// Evaluate raw payloads. Absent or malformed data yields an ineligible outcome.
pub fn evaluate_payload(
    candidate: Option<&CandidatePayload>,
    opportunity: Option<&OpportunityPayload>,
) -> EligibilityOutcome {
    let candidate_id = CandidateId::unassigned();
    let opportunity_id = OpportunityId::unassigned();

    let (Some(candidate), Some(opportunity)) = (candidate, opportunity) else {
        return EligibilityOutcome::invalid(
            candidate_id,
            opportunity_id,
            "candidate and opportunity are both required".to_string(),
        );
    };

    let profile = match candidate_from_payload(candidate_id.clone(), candidate) {
        Ok(profile) => profile,
        Err(violation) => {
            debug!(%violation, "candidate payload rejected during eligibility check");
            return EligibilityOutcome::invalid(
                candidate_id,
                opportunity_id,
                format!("candidate {violation}"),
            );
        }
    };

    let record = match opportunity_from_payload(opportunity_id.clone(), opportunity) {
        Ok(record) => record,
        Err(violation) => {
            debug!(%violation, "opportunity payload rejected during eligibility check");
            return EligibilityOutcome::invalid(
                candidate_id,
                opportunity_id,
                format!("opportunity {violation}"),
            );
        }
    };

    evaluate(&profile, &record)
}

pub fn is_eligible_payload(
    candidate: Option<&CandidatePayload>,
    opportunity: Option<&OpportunityPayload>,
) -> bool {
    evaluate_payload(candidate, opportunity).is_eligible()
}
