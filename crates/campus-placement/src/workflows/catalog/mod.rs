//! Opportunity catalog import from spreadsheet (CSV) exports of a placement drive.

mod normalizer;
mod parser;

use crate::workflows::placement::domain::{OpportunityId, OpportunityRecord};
use crate::workflows::placement::intake::opportunity_from_payload;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::warn;

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read opportunity catalog: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid opportunity catalog CSV: {}", err),
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Catalog row that could not be turned into an opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    pub line: u64,
    pub opportunity_id: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogImport {
    pub opportunities: Vec<OpportunityRecord>,
    pub rejected: Vec<RejectedRow>,
}

pub struct OpportunityCatalogImporter;

impl OpportunityCatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CatalogImport, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<CatalogImport, CatalogImportError> {
        let mut import = CatalogImport::default();
        let mut seen: HashSet<String> = HashSet::new();

        for entry in parser::parse_entries(reader)? {
            let Some(opportunity_id) = entry.opportunity_id else {
                import.rejected.push(RejectedRow {
                    line: entry.line,
                    opportunity_id: None,
                    reason: "missing opportunity id".to_string(),
                });
                continue;
            };

            if !seen.insert(opportunity_id.clone()) {
                import.rejected.push(RejectedRow {
                    line: entry.line,
                    opportunity_id: Some(opportunity_id),
                    reason: "duplicate opportunity id".to_string(),
                });
                continue;
            }

            match opportunity_from_payload(OpportunityId(opportunity_id.clone()), &entry.payload) {
                Ok(record) => import.opportunities.push(record),
                Err(violation) => {
                    warn!(line = entry.line, %opportunity_id, %violation, "catalog row rejected");
                    import.rejected.push(RejectedRow {
                        line: entry.line,
                        opportunity_id: Some(opportunity_id),
                        reason: violation.to_string(),
                    });
                }
            }
        }

        Ok(import)
    }
}
