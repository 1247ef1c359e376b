//! Daily "Casting Pulse" rollup of casting-breakdown impressions.
//!
//! Raw rows are normalized, scored for sentiment, bucketed by
//! (date, region, project type), filtered under a privacy floor and written as
//! a sorted CSV (or Parquet) table.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod input;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod privacy;
pub mod sentiment;
pub mod types;

pub use config::{KeywordMatch, NoiseConfig, PulseConfig};
pub use error::{PulseError, Result};
pub use pipeline::{PulseOutcome, PulsePipeline, RunSummary};
pub use sentiment::SentimentScorer;
