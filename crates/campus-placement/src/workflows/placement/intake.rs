use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{
    parse_leading_number, CandidateId, CandidateProfile, Compensation, OpportunityId,
    OpportunityRecord, OpportunityType, Slab,
};

/// Validation errors raised while normalizing wire payloads.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` is malformed: {detail}")]
    Malformed { field: &'static str, detail: String },
    #[error("cgpa {0} is outside 0..=10")]
    CgpaOutOfRange(f64),
    #[error("slab {0} is outside 0..=4")]
    SlabOutOfRange(f64),
}

/// Numeric field as the data layer hands it over: a number, free text, or a
/// decimal object such as `{"$numberDecimal": "12.5"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    Number(f64),
    Decimal {
        #[serde(rename = "$numberDecimal")]
        value: String,
    },
    Text(String),
}

impl NumericValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumericValue::Number(value) => value.is_finite().then_some(*value),
            NumericValue::Decimal { value } | NumericValue::Text(value) => {
                parse_leading_number(value).map(f64::from)
            }
        }
    }

    fn label(&self) -> String {
        match self {
            NumericValue::Number(value) => format!("{value}"),
            NumericValue::Decimal { value } | NumericValue::Text(value) => value.trim().to_string(),
        }
    }

    fn into_compensation(self) -> Compensation {
        let label = self.label();
        let amount = self.as_f64().map(|value| value as f32);
        Compensation { label, amount }
    }
}

/// A single value or a list, since postings store batches both ways.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Candidate profile as posted by the client; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePayload {
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub batch: Option<NumericValue>,
    #[serde(default)]
    pub cgpa: Option<NumericValue>,
    #[serde(default)]
    pub internship_eligible: Option<bool>,
    #[serde(default)]
    pub full_time_eligible: Option<bool>,
    #[serde(default)]
    pub slab: Option<NumericValue>,
}

/// Opportunity record as posted by an administrator; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityPayload {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub eligible_branches: Option<OneOrMany<String>>,
    #[serde(default)]
    pub eligible_batch: Option<OneOrMany<NumericValue>>,
    /// Plural spelling found in part of the stored postings; merged with `eligible_batch`.
    #[serde(default)]
    pub eligible_batches: Option<OneOrMany<NumericValue>>,
    #[serde(default)]
    pub cgpa_criteria: Option<NumericValue>,
    #[serde(default)]
    pub ctc: Option<NumericValue>,
    #[serde(default)]
    pub stipend: Option<NumericValue>,
    #[serde(default)]
    pub opportunity_type: Option<String>,
}

pub fn candidate_from_payload(
    candidate_id: CandidateId,
    payload: &CandidatePayload,
) -> Result<CandidateProfile, IntakeViolation> {
    let branch = payload
        .branch
        .as_deref()
        .map(str::trim)
        .filter(|branch| !branch.is_empty())
        .ok_or(IntakeViolation::MissingField("branch"))?
        .to_string();

    let batch = payload
        .batch
        .as_ref()
        .ok_or(IntakeViolation::MissingField("batch"))
        .and_then(|value| batch_year("batch", value))?;

    let cgpa = payload
        .cgpa
        .as_ref()
        .ok_or(IntakeViolation::MissingField("cgpa"))?
        .as_f64()
        .ok_or_else(|| IntakeViolation::Malformed {
            field: "cgpa",
            detail: "expected a number".to_string(),
        })?;
    if !(0.0..=10.0).contains(&cgpa) {
        return Err(IntakeViolation::CgpaOutOfRange(cgpa));
    }

    // An unknown attained slab must not unlock the upgrade rule.
    let slab = match &payload.slab {
        None => Slab::MAX,
        Some(value) => attained_slab(value)?,
    };

    Ok(CandidateProfile {
        candidate_id,
        branch,
        batch,
        cgpa: cgpa as f32,
        internship_eligible: payload.internship_eligible.unwrap_or(false),
        full_time_eligible: payload.full_time_eligible.unwrap_or(false),
        slab,
    })
}

pub fn opportunity_from_payload(
    opportunity_id: OpportunityId,
    payload: &OpportunityPayload,
) -> Result<OpportunityRecord, IntakeViolation> {
    let eligible_branches: BTreeSet<String> = payload
        .eligible_branches
        .clone()
        .ok_or(IntakeViolation::MissingField("eligibleBranches"))?
        .into_vec()
        .into_iter()
        .map(|branch| branch.trim().to_string())
        .filter(|branch| !branch.is_empty())
        .collect();

    let eligible_batches = [
        ("eligibleBatch", &payload.eligible_batch),
        ("eligibleBatches", &payload.eligible_batches),
    ]
    .into_iter()
    .filter_map(|(field, batches)| batches.clone().map(|batches| (field, batches)))
    .flat_map(|(field, batches)| {
        batches
            .into_vec()
            .into_iter()
            .map(move |value| batch_year(field, &value))
    })
    .collect::<Result<BTreeSet<u16>, _>>()?;

    let cgpa_criteria = payload
        .cgpa_criteria
        .as_ref()
        .ok_or(IntakeViolation::MissingField("cgpaCriteria"))?
        .as_f64()
        .ok_or_else(|| IntakeViolation::Malformed {
            field: "cgpaCriteria",
            detail: "expected a number".to_string(),
        })?;

    let raw_type = payload
        .opportunity_type
        .as_deref()
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .ok_or(IntakeViolation::MissingField("opportunityType"))?;
    let opportunity_type = OpportunityType::from_label(raw_type).unwrap_or_else(|| {
        warn!(
            %opportunity_id,
            opportunity_type = raw_type,
            "unrecognized opportunity type; requiring every predicate"
        );
        OpportunityType::InternshipAndFullTime
    });

    Ok(OpportunityRecord {
        company_name: payload.company_name.clone().unwrap_or_default(),
        role: payload.role.clone().unwrap_or_default(),
        opportunity_id,
        eligible_branches,
        eligible_batches,
        cgpa_criteria: cgpa_criteria as f32,
        ctc: payload
            .ctc
            .clone()
            .map(NumericValue::into_compensation)
            .unwrap_or_else(Compensation::unspecified),
        stipend: payload
            .stipend
            .clone()
            .map(NumericValue::into_compensation)
            .unwrap_or_else(Compensation::unspecified),
        opportunity_type,
    })
}

fn attained_slab(value: &NumericValue) -> Result<Slab, IntakeViolation> {
    let raw = value.as_f64().ok_or_else(|| IntakeViolation::Malformed {
        field: "slab",
        detail: "expected a slab number".to_string(),
    })?;

    if raw.fract() != 0.0 || !(0.0..=f64::from(Slab::MAX.value())).contains(&raw) {
        return Err(IntakeViolation::SlabOutOfRange(raw));
    }

    Slab::new(raw as u8).ok_or(IntakeViolation::SlabOutOfRange(raw))
}

fn batch_year(field: &'static str, value: &NumericValue) -> Result<u16, IntakeViolation> {
    let raw = value.as_f64().ok_or_else(|| IntakeViolation::Malformed {
        field,
        detail: "expected a graduating year".to_string(),
    })?;

    if raw.fract() != 0.0 || raw < 0.0 || raw > f64::from(u16::MAX) {
        return Err(IntakeViolation::Malformed {
            field,
            detail: format!("{raw} is not a graduating year"),
        });
    }

    Ok(raw as u16)
}
