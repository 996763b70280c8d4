use super::super::domain::{CandidateProfile, OpportunityRecord, Slab};
use super::rules::PredicateSignals;
use serde::{Deserialize, Serialize};

/// Whether the candidate may apply, and why not when they may not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum EligibilityDecision {
    Eligible { full_time_upgrade: bool },
    Ineligible { reasons: Vec<IneligibilityReason> },
}

impl EligibilityDecision {
    pub fn is_eligible(&self) -> bool {
        matches!(self, EligibilityDecision::Eligible { .. })
    }

    pub fn reasons(&self) -> &[IneligibilityReason] {
        match self {
            EligibilityDecision::Eligible { .. } => &[],
            EligibilityDecision::Ineligible { reasons } => reasons,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            EligibilityDecision::Eligible {
                full_time_upgrade: true,
            } => "eligible (offer exceeds attained slab)".to_string(),
            EligibilityDecision::Eligible { .. } => "eligible".to_string(),
            EligibilityDecision::Ineligible { reasons } => {
                if reasons.is_empty() {
                    "not eligible".to_string()
                } else {
                    let details: Vec<String> =
                        reasons.iter().map(IneligibilityReason::summary).collect();
                    format!("not eligible: {}", details.join("; "))
                }
            }
        }
    }
}

/// Failed predicate, phrased so the UI can explain a disabled "Apply" action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum IneligibilityReason {
    BranchNotEligible {
        branch: String,
    },
    BatchNotEligible {
        batch: u16,
    },
    CgpaBelowCriteria {
        required: f32,
        actual: f32,
    },
    InternshipNotPermitted,
    FullTimeNotPermitted {
        offer_slab: Option<Slab>,
        attained_slab: Slab,
    },
    InvalidData {
        detail: String,
    },
}

impl IneligibilityReason {
    pub fn summary(&self) -> String {
        match self {
            IneligibilityReason::BranchNotEligible { branch } => {
                format!("branch {branch} not eligible")
            }
            IneligibilityReason::BatchNotEligible { batch } => {
                format!("batch {batch} not eligible")
            }
            IneligibilityReason::CgpaBelowCriteria { required, actual } => format!(
                "cgpa {:.2} below required {:.2}",
                actual, required
            ),
            IneligibilityReason::InternshipNotPermitted => {
                "internship eligibility withdrawn".to_string()
            }
            IneligibilityReason::FullTimeNotPermitted {
                offer_slab: Some(offer),
                attained_slab,
            } => format!(
                "full-time eligibility exhausted (offer slab {offer}, attained slab {attained_slab})"
            ),
            IneligibilityReason::FullTimeNotPermitted {
                offer_slab: None, ..
            } => "full-time eligibility exhausted".to_string(),
            IneligibilityReason::InvalidData { detail } => format!("invalid data: {detail}"),
        }
    }
}

pub(crate) fn decide_outcome(
    candidate: &CandidateProfile,
    opportunity: &OpportunityRecord,
    signals: &PredicateSignals,
) -> EligibilityDecision {
    let mut reasons = Vec::new();

    if !signals.branch {
        reasons.push(IneligibilityReason::BranchNotEligible {
            branch: candidate.branch.clone(),
        });
    }

    if !signals.batch {
        reasons.push(IneligibilityReason::BatchNotEligible {
            batch: candidate.batch,
        });
    }

    if !signals.cgpa {
        reasons.push(IneligibilityReason::CgpaBelowCriteria {
            required: opportunity.cgpa_criteria,
            actual: candidate.cgpa,
        });
    }

    let needs_internship = opportunity.opportunity_type.requires_internship();
    let needs_full_time = opportunity.opportunity_type.requires_full_time();

    if needs_internship && !signals.internship {
        reasons.push(IneligibilityReason::InternshipNotPermitted);
    }

    if needs_full_time && !signals.full_time {
        reasons.push(IneligibilityReason::FullTimeNotPermitted {
            offer_slab: signals.offer_slab,
            attained_slab: candidate.slab,
        });
    }

    if reasons.is_empty() {
        EligibilityDecision::Eligible {
            full_time_upgrade: needs_full_time && signals.full_time_upgrade,
        }
    } else {
        EligibilityDecision::Ineligible { reasons }
    }
}
