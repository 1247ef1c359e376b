// src/input.rs

use csv::{ReaderBuilder, StringRecord};
use std::{
    fs::File,
    io::{self, BufReader},
    path::Path,
};
use tracing::{info, warn};

use crate::error::{PulseError, Result};
use crate::normalize::utils::clean_str;
use crate::types::RawBreakdown;

/// Accepted header names per field, canonical name first.
const POSTED_DATE: &[&str] = &["posted_date"];
const WORK_COUNTRY: &[&str] = &["work_country", "work_location"];
const PROJECT_TYPE: &[&str] = &["project_type"];
const RATE_VALUE: &[&str] = &["rate_value", "rate"];
const UNION_STATUS: &[&str] = &["union_status", "union"];
const ROLE_BILLING: &[&str] = &["role_billing", "role_type", "billing"];
const ROLE_DESCRIPTION: &[&str] = &["role_description"];

/// Column index per field, resolved once from the header row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    posted_date: Option<usize>,
    work_country: Option<usize>,
    project_type: Option<usize>,
    rate_value: Option<usize>,
    union_status: Option<usize>,
    role_billing: Option<usize>,
    role_description: Option<usize>,
}

impl ColumnMap {
    pub fn from_headers(headers: &StringRecord) -> Self {
        let names: Vec<String> = headers
            .iter()
            .map(|h| clean_str(h.trim_start_matches('\u{feff}')).to_lowercase())
            .collect();
        // canonical beats alias, whatever the column order
        let find = |aliases: &[&str]| {
            aliases
                .iter()
                .find_map(|a| names.iter().position(|n| n == a))
        };
        Self {
            posted_date: find(POSTED_DATE),
            work_country: find(WORK_COUNTRY),
            project_type: find(PROJECT_TYPE),
            rate_value: find(RATE_VALUE),
            union_status: find(UNION_STATUS),
            role_billing: find(ROLE_BILLING),
            role_description: find(ROLE_DESCRIPTION),
        }
    }

    pub fn has_posted_date(&self) -> bool {
        self.posted_date.is_some()
    }

    pub fn extract(&self, record: &StringRecord, line: u64) -> RawBreakdown {
        let get = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(clean_str)
                .filter(|s| !s.is_empty())
        };
        RawBreakdown {
            line,
            posted_date: get(self.posted_date),
            work_country: get(self.work_country),
            project_type: get(self.project_type),
            rate_value: get(self.rate_value),
            union_status: get(self.union_status),
            role_billing: get(self.role_billing),
            role_description: get(self.role_description),
        }
    }
}

/// Every record of an input file, plus the records that could not be decoded.
#[derive(Debug, Default)]
pub struct InputBatch {
    pub rows: Vec<RawBreakdown>,
    pub undecodable: u64,
}

/// Read the whole input file into memory.
///
/// Missing file, unreadable header or a missing `posted_date` column are fatal.
/// A record that fails to decode is logged and counted, not fatal.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.display()))]
pub fn read_breakdowns(path: &Path) -> Result<InputBatch> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => PulseError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => PulseError::InputRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // short rows just leave trailing fields empty
        .from_reader(BufReader::new(file));

    let headers = rdr.headers().map_err(|e| PulseError::InputRead {
        path: path.to_path_buf(),
        reason: format!("reading header: {}", e),
    })?;
    let columns = ColumnMap::from_headers(headers);
    if !columns.has_posted_date() {
        return Err(PulseError::MissingColumn {
            path: path.to_path_buf(),
            column: "posted_date",
        });
    }

    let mut batch = InputBatch::default();
    for result in rdr.records() {
        match result {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                batch.rows.push(columns.extract(&record, line));
            }
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                return Err(PulseError::InputRead {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                warn!(line, error = %e, "skipping undecodable record");
                batch.undecodable += 1;
            }
        }
    }

    info!(
        rows = batch.rows.len(),
        undecodable = batch.undecodable,
        "read input"
    );
    Ok(batch)
}
