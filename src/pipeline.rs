// src/pipeline.rs

use chrono::NaiveDate;
use serde::Serialize;
use std::{collections::BTreeSet, fs, path::Path};
use tracing::{debug, info, warn};

use crate::aggregate::{aggregate, finalize_all};
use crate::config::PulseConfig;
use crate::error::{PulseError, Result};
use crate::input::read_breakdowns;
use crate::normalize::Normalizer;
use crate::output::{build_rows, write_pulse, PulseRow};
use crate::privacy::PrivacyFilter;
use crate::sentiment::{annotate, AiThemeDetector, LexiconScorer, SentimentScorer};
use crate::types::{ProjectTypeCode, RawBreakdown, RegionCode};

/// Counters and ranges describing one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub rows_read: u64,
    pub undecodable_records: u64,
    pub malformed_rows: u64,
    pub sentiment_fallbacks: u64,
    pub buckets_formed: usize,
    pub buckets_suppressed: usize,
    pub rows_emitted: usize,
    pub roles_emitted: u64,
    pub min_bucket_size: u64,
    pub noise_enabled: bool,
    pub sentiment_model: String,
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
    pub regions: Vec<RegionCode>,
    pub project_types: Vec<ProjectTypeCode>,
}

impl RunSummary {
    pub fn skipped_rows(&self) -> u64 {
        self.undecodable_records + self.malformed_rows
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| PulseError::output(path, std::io::Error::other(e)))?;
        fs::write(path, json).map_err(|e| PulseError::output(path, e))
    }

    /// The end-of-run report: warnings for anything skipped, then the ranges.
    pub fn log(&self) {
        if self.malformed_rows > 0 || self.undecodable_records > 0 {
            warn!(
                malformed = self.malformed_rows,
                undecodable = self.undecodable_records,
                "skipped rows"
            );
        }
        if self.sentiment_fallbacks > 0 {
            warn!(
                fallbacks = self.sentiment_fallbacks,
                "rows scored 0 after sentiment failures"
            );
        }
        let fmt_date = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
        info!(
            "Dates: {} to {}",
            fmt_date(self.date_min),
            fmt_date(self.date_max)
        );
        info!("Regions: {:?}", self.regions);
        info!("Project Types: {:?}", self.project_types);
        info!(
            rows = self.rows_emitted,
            roles = self.roles_emitted,
            suppressed = self.buckets_suppressed,
            "pulse summary"
        );
    }
}

/// Rows ready to write, with the summary of how they were made.
#[derive(Debug, Clone)]
pub struct PulseOutcome {
    pub rows: Vec<PulseRow>,
    pub summary: RunSummary,
}

/// Raw rows → sorted pulse rows, under one configuration.
pub struct PulsePipeline {
    config: PulseConfig,
    normalizer: Normalizer,
    scorer: Box<dyn SentimentScorer>,
    themes: AiThemeDetector,
}

impl PulsePipeline {
    /// Pipeline with the default lexicon scorer.
    pub fn new(config: PulseConfig) -> Result<Self> {
        Self::with_scorer(config, Box::new(LexiconScorer::new()))
    }

    pub fn with_scorer(config: PulseConfig, scorer: Box<dyn SentimentScorer>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            normalizer: Normalizer::new(config.normalized_lead_tiers(), config.project_type_match),
            themes: AiThemeDetector::new(config.normalized_ai_keywords(), config.ai_match),
            scorer,
            config,
        })
    }

    pub fn config(&self) -> &PulseConfig {
        &self.config
    }

    /// Run every stage over an in-memory batch. Row-level failures are
    /// counted in the summary; nothing here is fatal.
    pub fn build(&self, raw: &[RawBreakdown]) -> PulseOutcome {
        let mut summary = RunSummary {
            rows_read: raw.len() as u64,
            min_bucket_size: self.config.min_bucket_size,
            noise_enabled: self.config.noise.enabled,
            sentiment_model: self.scorer.model_version().to_string(),
            ..RunSummary::default()
        };

        let mut rows = Vec::with_capacity(raw.len());
        for r in raw {
            match self.normalizer.normalize(r) {
                Ok(n) => rows.push(n),
                Err(e) => {
                    debug!(error = %e, "dropping row");
                    summary.malformed_rows += 1;
                }
            }
        }
        info!(
            normalized = rows.len(),
            malformed = summary.malformed_rows,
            "normalized rows"
        );

        summary.sentiment_fallbacks = annotate(
            &mut rows,
            self.scorer.as_ref(),
            &self.themes,
            self.config.parallel_scoring,
        );

        let buckets = aggregate(&rows);
        summary.buckets_formed = buckets.len();
        let stats = finalize_all(&buckets);

        let mut filter = PrivacyFilter::new(self.config.min_bucket_size, &self.config.noise);
        let filtered = filter.apply(stats);
        summary.buckets_suppressed = filtered.suppressed;

        let out = build_rows(&filtered.kept);
        summary.rows_emitted = out.len();
        summary.roles_emitted = out.iter().map(|r| r.role_count_day).sum();
        summary.date_min = out.first().map(|r| r.date_utc);
        summary.date_max = out.last().map(|r| r.date_utc);
        summary.regions = out
            .iter()
            .map(|r| r.region_code)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        summary.project_types = out
            .iter()
            .map(|r| r.proj_type_code)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        PulseOutcome { rows: out, summary }
    }

    /// Read `input`, build the pulse, write it to `output`.
    ///
    /// The input is read in full before anything is written, so a fatal input
    /// error never leaves an output file behind.
    #[tracing::instrument(level = "info", skip(self, input, output), fields(input = %input.display(), output = %output.display()))]
    pub fn run(&self, input: &Path, output: &Path) -> Result<RunSummary> {
        info!("Reading input from {}...", input.display());
        let batch = read_breakdowns(input)?;

        let PulseOutcome { rows, mut summary } = self.build(&batch.rows);
        summary.rows_read += batch.undecodable;
        summary.undecodable_records = batch.undecodable;

        info!("Writing output to {}...", output.display());
        write_pulse(output, &rows, self.config.include_theme_share)?;
        summary.log();
        Ok(summary)
    }
}
