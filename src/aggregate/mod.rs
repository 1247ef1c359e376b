// src/aggregate/mod.rs

pub mod rounding;

use std::collections::BTreeMap;
use tracing::info;

use crate::types::{BucketKey, NormalizedBreakdown};
use rounding::{clamp_sentiment, mean, median, round_to_multiple, share};

/// Median rates are reported to the nearest multiple of this many dollars.
pub const RATE_STEP_USD: f64 = 250.0;

/// Running totals for one (date, region, project type) key.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub key: BucketKey,
    pub count: u64,
    pub lead_count: u64,
    pub union_count: u64,
    pub ai_count: u64,
    /// In arrival order; missing rates are never pushed.
    pub rates: Vec<f64>,
    pub sentiments: Vec<f64>,
}

impl Bucket {
    fn new(key: BucketKey) -> Self {
        Self {
            key,
            count: 0,
            lead_count: 0,
            union_count: 0,
            ai_count: 0,
            rates: Vec::new(),
            sentiments: Vec::new(),
        }
    }

    fn push(&mut self, row: &NormalizedBreakdown) {
        self.count += 1;
        self.lead_count += row.is_lead as u64;
        self.union_count += row.is_union as u64;
        self.ai_count += row.is_ai_theme as u64;
        if let Some(rate) = row.rate_usd {
            self.rates.push(rate);
        }
        self.sentiments.push(row.sentiment_score);
    }

    /// Close the bucket and compute its statistics.
    pub fn finalize(&self) -> BucketStats {
        let median_rate_usd = median(&self.rates)
            .map(|m| round_to_multiple(m, RATE_STEP_USD))
            .map(|m| m.max(0.0) as u64);
        let sentiment_avg = mean(&self.sentiments).map(clamp_sentiment).unwrap_or(0.0);

        let mut stats = BucketStats {
            key: self.key,
            role_count: self.count,
            lead_count: self.lead_count,
            union_count: self.union_count,
            ai_count: self.ai_count,
            lead_share: 0.0,
            union_share: 0.0,
            ai_share: 0.0,
            median_rate_usd,
            sentiment_avg,
        };
        stats.recompute_shares();
        stats
    }
}

/// Finalized statistics for one bucket. Counts are kept alongside the shares
/// so the privacy filter can perturb them and recompute.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketStats {
    pub key: BucketKey,
    pub role_count: u64,
    pub lead_count: u64,
    pub union_count: u64,
    pub ai_count: u64,
    pub lead_share: f64,
    pub union_share: f64,
    pub ai_share: f64,
    /// Multiple of [`RATE_STEP_USD`], `None` when the bucket had no rates.
    pub median_rate_usd: Option<u64>,
    /// Multiple of 0.05 in [-1, 1].
    pub sentiment_avg: f64,
}

impl BucketStats {
    /// Derive the three shares from the current counts.
    pub fn recompute_shares(&mut self) {
        self.lead_share = share(self.lead_count, self.role_count);
        self.union_share = share(self.union_count, self.role_count);
        self.ai_share = share(self.ai_count, self.role_count);
    }
}

/// Group rows by bucket key. Buckets are created on first sight, so none is empty.
pub fn aggregate(rows: &[NormalizedBreakdown]) -> BTreeMap<BucketKey, Bucket> {
    let mut buckets: BTreeMap<BucketKey, Bucket> = BTreeMap::new();
    for row in rows {
        let key = row.key();
        buckets
            .entry(key)
            .or_insert_with(|| Bucket::new(key))
            .push(row);
    }
    info!(rows = rows.len(), buckets = buckets.len(), "aggregated rows");
    buckets
}

pub fn finalize_all(buckets: &BTreeMap<BucketKey, Bucket>) -> BTreeMap<BucketKey, BucketStats> {
    buckets.iter().map(|(k, b)| (*k, b.finalize())).collect()
}
