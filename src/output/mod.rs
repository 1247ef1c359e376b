// src/output/mod.rs

pub mod columnar;

use chrono::NaiveDate;
use std::{collections::BTreeMap, fs, path::Path};
use tracing::info;

use crate::aggregate::BucketStats;
use crate::error::{PulseError, Result};
use crate::types::{BucketKey, ProjectTypeCode, RegionCode};

pub const BASE_COLUMNS: [&str; 8] = [
    "date_utc",
    "region_code",
    "proj_type_code",
    "role_count_day",
    "lead_share_pct_day",
    "union_share_pct_day",
    "median_rate_day_usd",
    "sentiment_avg_day",
];

pub const THEME_COLUMN: &str = "theme_ai_share_pct_day";

/// One line of the pulse file.
#[derive(Debug, Clone, PartialEq)]
pub struct PulseRow {
    pub date_utc: NaiveDate,
    pub region_code: RegionCode,
    pub proj_type_code: ProjectTypeCode,
    pub role_count_day: u64,
    pub lead_share_pct_day: f64,
    pub union_share_pct_day: f64,
    pub median_rate_day_usd: Option<u64>,
    pub sentiment_avg_day: f64,
    pub theme_ai_share_pct_day: f64,
}

impl PulseRow {
    fn from_stats(stats: &BucketStats) -> Self {
        Self {
            date_utc: stats.key.date_utc,
            region_code: stats.key.region_code,
            proj_type_code: stats.key.proj_type_code,
            role_count_day: stats.role_count,
            lead_share_pct_day: stats.lead_share,
            union_share_pct_day: stats.union_share,
            median_rate_day_usd: stats.median_rate_usd,
            sentiment_avg_day: stats.sentiment_avg,
            theme_ai_share_pct_day: stats.ai_share,
        }
    }

    /// Sort key compared as strings: ISO date, then the literal codes.
    pub fn sort_key(&self) -> (String, &'static str, &'static str) {
        (
            self.date_utc.format("%Y-%m-%d").to_string(),
            self.region_code.as_str(),
            self.proj_type_code.as_str(),
        )
    }

    /// Text fields in column order.
    pub fn to_record(&self, include_theme: bool) -> Vec<String> {
        let mut rec = vec![
            self.date_utc.format("%Y-%m-%d").to_string(),
            self.region_code.to_string(),
            self.proj_type_code.to_string(),
            self.role_count_day.to_string(),
            fmt_fixed(self.lead_share_pct_day, 1),
            fmt_fixed(self.union_share_pct_day, 1),
            self.median_rate_day_usd
                .map(|m| m.to_string())
                .unwrap_or_default(),
            fmt_fixed(self.sentiment_avg_day, 2),
        ];
        if include_theme {
            rec.push(fmt_fixed(self.theme_ai_share_pct_day, 1));
        }
        rec
    }
}

/// Fixed-precision number that never renders as "-0.0".
pub fn fmt_fixed(x: f64, dp: usize) -> String {
    let s = format!("{:.*}", dp, x);
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}

pub fn header(include_theme: bool) -> Vec<&'static str> {
    let mut cols = BASE_COLUMNS.to_vec();
    if include_theme {
        cols.push(THEME_COLUMN);
    }
    cols
}

/// Build the output rows, one per surviving bucket, sorted by key.
pub fn build_rows(buckets: &BTreeMap<BucketKey, BucketStats>) -> Vec<PulseRow> {
    let mut rows: Vec<PulseRow> = buckets.values().map(PulseRow::from_stats).collect();
    rows.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    rows
}

/// Render rows as CSV bytes.
pub fn render_csv(rows: &[PulseRow], include_theme: bool) -> std::result::Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    wtr.write_record(header(include_theme))?;
    for row in rows {
        wtr.write_record(row.to_record(include_theme))?;
    }
    wtr.into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))
}

/// Write the pulse to `path`. A `.parquet` extension selects Parquet, anything
/// else is CSV. The CSV is rendered in memory first, so a failed render never
/// leaves a partial file behind.
pub fn write_pulse(path: &Path, rows: &[PulseRow], include_theme: bool) -> Result<()> {
    let is_parquet = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));

    if is_parquet {
        columnar::write_parquet(path, rows, include_theme)?;
    } else {
        let bytes = render_csv(rows, include_theme).map_err(|e| PulseError::output(path, e))?;
        fs::write(path, bytes).map_err(|e| PulseError::output(path, e))?;
    }
    info!(path = %path.display(), rows = rows.len(), parquet = is_parquet, "wrote pulse");
    Ok(())
}
