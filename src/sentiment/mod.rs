// src/sentiment/mod.rs

pub mod lexicon;
pub mod theme;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{PulseError, Result};
use crate::types::NormalizedBreakdown;

pub use lexicon::LexiconScorer;
pub use theme::AiThemeDetector;

/// Text → polarity in [-1, 1].
///
/// Implementations must be deterministic for a fixed `model_version` and free
/// of side effects. Returning an error is allowed; the pipeline scores the row
/// 0 and counts it.
pub trait SentimentScorer: Send + Sync {
    fn model_version(&self) -> &str;
    fn score(&self, text: &str) -> Result<f64>;
}

/// Score one text under the scorer contract: blank text is 0, output is
/// clamped to [-1, 1], errors and non-finite values become `SentimentScoring`.
pub fn score_text(scorer: &dyn SentimentScorer, text: &str) -> Result<f64> {
    if text.trim().is_empty() {
        return Ok(0.0);
    }
    let s = scorer.score(text)?;
    if !s.is_finite() {
        return Err(PulseError::SentimentScoring(format!(
            "{} returned non-finite score {}",
            scorer.model_version(),
            s
        )));
    }
    Ok(s.clamp(-1.0, 1.0))
}

/// Fill `sentiment_score` and `is_ai_theme` on every row.
///
/// Returns the number of rows whose scoring failed and fell back to 0.
/// With `parallel` the scores are computed on the rayon pool; results are
/// collected by index so they stay paired with their rows.
pub fn annotate(
    rows: &mut [NormalizedBreakdown],
    scorer: &dyn SentimentScorer,
    themes: &AiThemeDetector,
    parallel: bool,
) -> u64 {
    let score_one = |row: &NormalizedBreakdown| -> (Option<f64>, bool) {
        let score = match score_text(scorer, &row.role_description) {
            Ok(s) => Some(s),
            Err(e) => {
                debug!(line = row.line, error = %e, "sentiment fallback to 0");
                None
            }
        };
        (score, themes.is_ai_theme(&row.role_description))
    };

    let results: Vec<(Option<f64>, bool)> = if parallel {
        rows.par_iter().map(score_one).collect()
    } else {
        rows.iter().map(score_one).collect()
    };

    let mut fallbacks = 0u64;
    for (row, (score, ai)) in rows.iter_mut().zip(results) {
        row.sentiment_score = score.unwrap_or_else(|| {
            fallbacks += 1;
            0.0
        });
        row.is_ai_theme = ai;
    }

    info!(
        rows = rows.len(),
        fallbacks,
        model = scorer.model_version(),
        "scored role descriptions"
    );
    fallbacks
}
