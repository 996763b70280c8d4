use super::normalizer::{normalize_header, split_list};
use crate::workflows::placement::intake::{NumericValue, OneOrMany, OpportunityPayload};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct CatalogEntry {
    pub(crate) line: u64,
    pub(crate) opportunity_id: Option<String>,
    pub(crate) payload: OpportunityPayload,
}

pub(crate) fn parse_entries<R: Read>(reader: R) -> Result<Vec<CatalogEntry>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: csv::StringRecord = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let mut entries = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|position| position.line()).unwrap_or(0);
        let row: CatalogRow = record.deserialize(Some(&headers))?;

        entries.push(CatalogEntry {
            line,
            opportunity_id: row.opportunity_id.clone(),
            payload: row.into_payload(),
        });
    }

    Ok(entries)
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "opportunity id", default, deserialize_with = "empty_string_as_none")]
    opportunity_id: Option<String>,
    #[serde(rename = "company", default, deserialize_with = "empty_string_as_none")]
    company: Option<String>,
    #[serde(rename = "role", default, deserialize_with = "empty_string_as_none")]
    role: Option<String>,
    #[serde(
        rename = "eligible branches",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    eligible_branches: Option<String>,
    #[serde(
        rename = "eligible batches",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    eligible_batches: Option<String>,
    #[serde(
        rename = "cgpa criteria",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    cgpa_criteria: Option<String>,
    #[serde(rename = "ctc", default, deserialize_with = "empty_string_as_none")]
    ctc: Option<String>,
    #[serde(rename = "stipend", default, deserialize_with = "empty_string_as_none")]
    stipend: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "empty_string_as_none")]
    opportunity_type: Option<String>,
}

impl CatalogRow {
    fn into_payload(self) -> OpportunityPayload {
        OpportunityPayload {
            company_name: self.company,
            role: self.role,
            eligible_branches: self
                .eligible_branches
                .map(|cell| OneOrMany::Many(split_list(&cell))),
            eligible_batch: self.eligible_batches.map(|cell| {
                OneOrMany::Many(split_list(&cell).into_iter().map(NumericValue::Text).collect())
            }),
            eligible_batches: None,
            cgpa_criteria: self.cgpa_criteria.map(NumericValue::Text),
            ctc: self.ctc.map(NumericValue::Text),
            stipend: self.stipend.map(NumericValue::Text),
            opportunity_type: self.opportunity_type,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
