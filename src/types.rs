// src/types.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One casting-breakdown impression as it appears in the input file.
/// Every field is optional at this stage; the normalizer decides what is fatal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBreakdown {
    /// 1-based line in the input, header included. Used in log messages only.
    pub line: u64,
    pub posted_date: Option<String>,
    pub work_country: Option<String>,
    pub project_type: Option<String>,
    pub rate_value: Option<String>,
    pub union_status: Option<String>,
    pub role_billing: Option<String>,
    pub role_description: Option<String>,
}

/// Variants are declared in code order so the derived `Ord` matches string order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegionCode {
    AP,
    EU,
    LA,
    NA,
}

impl RegionCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionCode::AP => "AP",
            RegionCode::EU => "EU",
            RegionCode::LA => "LA",
            RegionCode::NA => "NA",
        }
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// F = film, T = television/streaming, C = commercial, V = everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProjectTypeCode {
    C,
    F,
    T,
    V,
}

impl ProjectTypeCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectTypeCode::C => "C",
            ProjectTypeCode::F => "F",
            ProjectTypeCode::T => "T",
            ProjectTypeCode::V => "V",
        }
    }
}

impl fmt::Display for ProjectTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorical reading of the `union_status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionStatus {
    Union,
    NonUnion,
    Unknown,
}

/// Aggregation key. Field order gives the output sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    pub date_utc: NaiveDate,
    pub region_code: RegionCode,
    pub proj_type_code: ProjectTypeCode,
}

/// A breakdown after field normalization. `sentiment_score` and `is_ai_theme`
/// are filled in by the sentiment stage.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBreakdown {
    pub line: u64,
    pub date_utc: NaiveDate,
    pub region_code: RegionCode,
    pub proj_type_code: ProjectTypeCode,
    pub is_lead: bool,
    pub is_union: bool,
    pub rate_usd: Option<f64>,
    pub role_description: String,
    pub sentiment_score: f64,
    pub is_ai_theme: bool,
}

impl NormalizedBreakdown {
    pub fn key(&self) -> BucketKey {
        BucketKey {
            date_utc: self.date_utc,
            region_code: self.region_code,
            proj_type_code: self.proj_type_code,
        }
    }
}
