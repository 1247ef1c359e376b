// src/normalize/mod.rs

pub mod date_parser;
pub mod tables;
pub mod utils;

use tracing::debug;

use crate::config::KeywordMatch;
use crate::error::{PulseError, Result};
use crate::types::{NormalizedBreakdown, ProjectTypeCode, RawBreakdown, RegionCode, UnionStatus};
use date_parser::parse_date_utc;
use tables::{PROJECT_TYPE_TABLE, REGION_PHRASES};
use utils::{clean_str, contains_phrase, parse_rate, words};

/// Map a work location to its region. Unmatched or empty input is NA.
pub fn map_region(location: &str) -> RegionCode {
    let hay = words(location);
    if hay.is_empty() {
        return RegionCode::NA;
    }
    REGION_PHRASES
        .iter()
        .find(|(phrase, _)| contains_phrase(&hay, phrase))
        .map(|(_, code)| *code)
        .unwrap_or(RegionCode::NA)
}

/// Map free-text project type to F/T/C, falling back to V. Keywords match
/// as substrings.
pub fn map_project_type(project_type: &str) -> ProjectTypeCode {
    map_project_type_with(project_type, KeywordMatch::Substring)
}

/// Like [`map_project_type`], under an explicit matching policy. Whole-word
/// matching also accepts the keyword's plural ("ads", "films").
pub fn map_project_type_with(project_type: &str, policy: KeywordMatch) -> ProjectTypeCode {
    let lower = project_type.to_lowercase();
    let hay = words(&lower);
    for (code, keywords) in PROJECT_TYPE_TABLE {
        let hit = keywords.iter().any(|k| match policy {
            KeywordMatch::Substring => lower.contains(k),
            KeywordMatch::WholeWord => hay
                .iter()
                .any(|w| w == k || w.strip_suffix('s') == Some(*k)),
        });
        if hit {
            return *code;
        }
    }
    ProjectTypeCode::V
}

pub fn parse_union_status(raw: &str) -> UnionStatus {
    let token = clean_str(raw).to_lowercase();
    match token.as_str() {
        "union" | "sag" | "sag-aftra" | "sag/aftra" | "sag aftra" | "aftra" | "equity" | "yes"
        | "true" | "y" | "1" => UnionStatus::Union,
        "non-union" | "nonunion" | "non union" | "no" | "false" | "n" | "0" => {
            UnionStatus::NonUnion
        }
        _ => UnionStatus::Unknown,
    }
}

/// Turns raw rows into typed rows. Holds the lead tiers and project-type
/// policy from config.
#[derive(Debug, Clone)]
pub struct Normalizer {
    lead_tiers: Vec<String>,
    project_type_match: KeywordMatch,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(vec!["lead".into(), "principal".into()], KeywordMatch::Substring)
    }
}

impl Normalizer {
    /// `lead_tiers` must already be trimmed and lowercased.
    pub fn new(lead_tiers: Vec<String>, project_type_match: KeywordMatch) -> Self {
        Self {
            lead_tiers,
            project_type_match,
        }
    }

    pub fn is_lead(&self, billing: &str) -> bool {
        let token = clean_str(billing).to_lowercase();
        self.lead_tiers.iter().any(|t| *t == token)
    }

    /// Fails only when `posted_date` is missing or unparseable.
    pub fn normalize(&self, raw: &RawBreakdown) -> Result<NormalizedBreakdown> {
        let posted = raw.posted_date.as_deref().unwrap_or("");
        let date_utc = parse_date_utc(posted).ok_or_else(|| PulseError::MalformedRow {
            line: raw.line,
            reason: if posted.trim().is_empty() {
                "missing posted_date".to_string()
            } else {
                format!("unparseable posted_date {:?}", posted)
            },
        })?;

        let rate_usd = raw.rate_value.as_deref().and_then(parse_rate);
        if rate_usd.is_none() && raw.rate_value.as_deref().is_some_and(|r| !r.trim().is_empty()) {
            debug!(line = raw.line, rate = ?raw.rate_value, "rate treated as missing");
        }

        Ok(NormalizedBreakdown {
            line: raw.line,
            date_utc,
            region_code: map_region(raw.work_country.as_deref().unwrap_or("")),
            proj_type_code: map_project_type_with(
                raw.project_type.as_deref().unwrap_or(""),
                self.project_type_match,
            ),
            is_lead: self.is_lead(raw.role_billing.as_deref().unwrap_or("")),
            is_union: parse_union_status(raw.union_status.as_deref().unwrap_or(""))
                == UnionStatus::Union,
            rate_usd,
            role_description: raw.role_description.clone().unwrap_or_default(),
            sentiment_score: 0.0,
            is_ai_theme: false,
        })
    }
}
