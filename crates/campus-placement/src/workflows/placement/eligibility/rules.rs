use super::super::domain::{CandidateProfile, OpportunityRecord, Slab};
use super::slab::classify_slab;
use super::{EligibilityPredicate, PredicateCheck};

pub(crate) struct PredicateSignals {
    pub branch: bool,
    pub batch: bool,
    pub cgpa: bool,
    pub internship: bool,
    pub full_time: bool,
    /// Full-time eligibility was granted only because the offer beats the attained slab.
    pub full_time_upgrade: bool,
    pub offer_slab: Option<Slab>,
}

pub(crate) fn check_predicates(
    candidate: &CandidateProfile,
    opportunity: &OpportunityRecord,
) -> (Vec<PredicateCheck>, PredicateSignals) {
    let needs_internship = opportunity.opportunity_type.requires_internship();
    let needs_full_time = opportunity.opportunity_type.requires_full_time();

    let mut checks = Vec::with_capacity(5);

    let branch = opportunity.eligible_branches.contains(&candidate.branch);
    checks.push(PredicateCheck {
        predicate: EligibilityPredicate::Branch,
        passed: branch,
        required: true,
        notes: if branch {
            format!("branch {} is open for this posting", candidate.branch)
        } else {
            format!("branch {} is not among eligible branches", candidate.branch)
        },
    });

    let batch = opportunity.eligible_batches.is_empty()
        || opportunity.eligible_batches.contains(&candidate.batch);
    checks.push(PredicateCheck {
        predicate: EligibilityPredicate::Batch,
        passed: batch,
        required: true,
        notes: if opportunity.eligible_batches.is_empty() {
            "posting has no batch restriction".to_string()
        } else if batch {
            format!("batch {} is eligible", candidate.batch)
        } else {
            format!("batch {} is not eligible", candidate.batch)
        },
    });

    let cgpa = opportunity.cgpa_criteria <= candidate.cgpa;
    checks.push(PredicateCheck {
        predicate: EligibilityPredicate::Cgpa,
        passed: cgpa,
        required: true,
        notes: format!(
            "cgpa {:.2} against criteria {:.2}",
            candidate.cgpa, opportunity.cgpa_criteria
        ),
    });

    let internship = candidate.internship_eligible;
    checks.push(PredicateCheck {
        predicate: EligibilityPredicate::Internship,
        passed: internship,
        required: needs_internship,
        notes: if internship {
            "internship eligibility granted".to_string()
        } else {
            "internship eligibility withdrawn".to_string()
        },
    });

    let offer_slab = opportunity.ctc.amount.map(classify_slab);
    let full_time_upgrade = !candidate.full_time_eligible
        && offer_slab
            .map(|slab| slab > candidate.slab)
            .unwrap_or(false);
    let full_time = candidate.full_time_eligible || full_time_upgrade;
    checks.push(PredicateCheck {
        predicate: EligibilityPredicate::FullTime,
        passed: full_time,
        required: needs_full_time,
        notes: match (candidate.full_time_eligible, offer_slab) {
            (true, _) => "full-time eligibility granted".to_string(),
            (false, Some(slab)) if full_time_upgrade => format!(
                "offer slab {slab} exceeds attained slab {}",
                candidate.slab
            ),
            (false, Some(slab)) => format!(
                "offer slab {slab} does not exceed attained slab {}",
                candidate.slab
            ),
            (false, None) => "full-time eligibility exhausted and ctc is unparsed".to_string(),
        },
    });

    let signals = PredicateSignals {
        branch,
        batch,
        cgpa,
        internship,
        full_time,
        full_time_upgrade,
        offer_slab,
    };

    (checks, signals)
}
