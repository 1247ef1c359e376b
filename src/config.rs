// src/config.rs

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::info;

use crate::error::{PulseError, Result};

/// Privacy floor applied when nothing else is configured.
pub const DEFAULT_MIN_BUCKET_SIZE: u64 = 5;

/// How keywords are matched against free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMatch {
    /// Plain substring match. "said" counts as "ai".
    #[default]
    Substring,
    /// Keyword must be a whole word (or phrase) of the text.
    WholeWord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub enabled: bool,
    /// Laplace scale is `1 / epsilon`.
    pub epsilon: f64,
    pub seed: Option<u64>,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            epsilon: 1.0,
            seed: None,
        }
    }
}

/// Runtime knobs for a pulse build. Loaded from YAML, then overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    pub min_bucket_size: u64,
    pub noise: NoiseConfig,
    pub ai_keywords: Vec<String>,
    pub ai_match: KeywordMatch,
    /// Substring by default, so "broadway" reads as an ad.
    pub project_type_match: KeywordMatch,
    pub lead_tiers: Vec<String>,
    pub include_theme_share: bool,
    pub parallel_scoring: bool,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            min_bucket_size: DEFAULT_MIN_BUCKET_SIZE,
            noise: NoiseConfig::default(),
            ai_keywords: vec!["ai".into(), "robot".into(), "android".into()],
            ai_match: KeywordMatch::Substring,
            project_type_match: KeywordMatch::Substring,
            lead_tiers: vec!["lead".into(), "principal".into()],
            include_theme_share: true,
            parallel_scoring: true,
        }
    }
}

impl PulseConfig {
    /// Read a YAML config file. Missing keys keep their defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| PulseError::Config(format!("reading {}: {}", path.display(), e)))?;
        let cfg = Self::from_yaml_str(&text)?;
        info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Self = serde_yaml::from_str(text)
            .map_err(|e| PulseError::Config(format!("parsing yaml: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_bucket_size == 0 {
            return Err(PulseError::Config("min_bucket_size must be at least 1".into()));
        }
        if !(self.noise.epsilon.is_finite() && self.noise.epsilon > 0.0) {
            return Err(PulseError::Config(format!(
                "noise.epsilon must be a positive number, got {}",
                self.noise.epsilon
            )));
        }
        if self.ai_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(PulseError::Config("ai_keywords must not be empty".into()));
        }
        if self.lead_tiers.iter().all(|t| t.trim().is_empty()) {
            return Err(PulseError::Config("lead_tiers must not be empty".into()));
        }
        Ok(())
    }

    /// AI keywords, trimmed and lowercased, blanks removed.
    pub fn normalized_ai_keywords(&self) -> Vec<String> {
        normalize_tokens(&self.ai_keywords)
    }

    pub fn normalized_lead_tiers(&self) -> Vec<String> {
        normalize_tokens(&self.lead_tiers)
    }
}

fn normalize_tokens(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
