use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier wrapper for registered candidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl CandidateId {
    /// Placeholder used for inline checks where no stored candidate exists.
    pub fn unassigned() -> Self {
        Self("unassigned".to_string())
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for posted opportunities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OpportunityId(pub String);

impl OpportunityId {
    /// Placeholder used for inline checks where no stored opportunity exists.
    pub fn unassigned() -> Self {
        Self("unassigned".to_string())
    }
}

impl fmt::Display for OpportunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordinal compensation tier, `0..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Slab(u8);

impl Slab {
    pub const MIN: Slab = Slab(0);
    pub const MAX: Slab = Slab(4);

    pub const fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Slab {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Slab::new(value).ok_or_else(|| format!("slab {value} is outside 0..=4"))
    }
}

impl From<Slab> for u8 {
    fn from(slab: Slab) -> Self {
        slab.0
    }
}

impl fmt::Display for Slab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Academic and administrative attributes a student brings to a placement drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub candidate_id: CandidateId,
    pub branch: String,
    pub batch: u16,
    pub cgpa: f32,
    pub internship_eligible: bool,
    pub full_time_eligible: bool,
    /// Highest compensation slab already attained through an accepted offer.
    pub slab: Slab,
}

/// Free-text compensation as posted, with its leading figure parsed once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compensation {
    pub label: String,
    pub amount: Option<f32>,
}

impl Compensation {
    pub fn parse(label: impl Into<String>) -> Self {
        let label = label.into();
        let amount = parse_leading_number(&label);
        Self { label, amount }
    }

    pub fn from_amount(amount: f32) -> Self {
        Self {
            label: format!("{amount}"),
            amount: amount.is_finite().then_some(amount),
        }
    }

    pub fn unspecified() -> Self {
        Self {
            label: "-".to_string(),
            amount: None,
        }
    }
}

/// Parse the number that opens the first token of a free-text figure.
///
/// `"60 LPA"` yields 60, `"12.5LPA"` yields 12.5 and `"1,200 / month"` yields 1200.
/// Labels such as `"-"` or `"TBD"` yield `None`.
pub fn parse_leading_number(raw: &str) -> Option<f32> {
    let token = raw.split_whitespace().next()?;

    let mut prefix = String::new();
    let mut seen_dot = false;
    for ch in token.chars() {
        match ch {
            '0'..='9' => prefix.push(ch),
            ',' if !prefix.is_empty() && !seen_dot => {}
            '.' if !seen_dot => {
                seen_dot = true;
                prefix.push(ch);
            }
            _ => break,
        }
    }

    let value = prefix.trim_end_matches('.').parse::<f32>().ok()?;
    value.is_finite().then_some(value)
}

/// Posting category deciding which eligibility predicates are mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpportunityType {
    Internship,
    FullTime,
    InternshipAndFullTime,
}

impl OpportunityType {
    pub const fn label(self) -> &'static str {
        match self {
            OpportunityType::Internship => "Internship",
            OpportunityType::FullTime => "Full Time",
            OpportunityType::InternshipAndFullTime => "Internship + Full Time",
        }
    }

    pub const fn requires_internship(self) -> bool {
        matches!(
            self,
            OpportunityType::Internship | OpportunityType::InternshipAndFullTime
        )
    }

    pub const fn requires_full_time(self) -> bool {
        matches!(
            self,
            OpportunityType::FullTime | OpportunityType::InternshipAndFullTime
        )
    }

    /// Recognize a posted label exactly as published, ignoring surrounding
    /// whitespace. Anything else, including case or spelling variants, is unknown.
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Internship" => Some(Self::Internship),
            "Full Time" => Some(Self::FullTime),
            "Internship + Full Time" => Some(Self::InternshipAndFullTime),
            _ => None,
        }
    }
}

impl fmt::Display for OpportunityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for OpportunityType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for OpportunityType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        OpportunityType::from_label(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown opportunity type '{raw}'")))
    }
}

/// A company's posting as administrators published it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityRecord {
    pub opportunity_id: OpportunityId,
    pub company_name: String,
    pub role: String,
    pub eligible_branches: BTreeSet<String>,
    /// Empty means the posting places no restriction on graduating year.
    pub eligible_batches: BTreeSet<u16>,
    pub cgpa_criteria: f32,
    pub ctc: Compensation,
    pub stipend: Compensation,
    pub opportunity_type: OpportunityType,
}
