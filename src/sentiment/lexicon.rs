//! # Casting Lexicon
//!
//! Word-polarity lexicon for rule-based scoring of role descriptions.

use std::collections::HashMap;

use super::SentimentScorer;
use crate::error::Result;

/// Weight applied to a word polarity that follows a negation.
const NEGATION_FACTOR: f64 = -0.5;

/// How many words back a negation or intensifier still applies.
const MODIFIER_WINDOW: usize = 2;

/// Lexicon-based polarity scorer.
///
/// Score is the mean polarity of the lexicon words found in the text, after
/// negation and intensifier adjustments. Text with no lexicon words scores 0.
pub struct LexiconScorer {
    words: HashMap<&'static str, f64>,
    negations: Vec<&'static str>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub const MODEL_VERSION: &'static str = "lexicon-v1";

    pub fn new() -> Self {
        let positive = [
            ("good", 0.7),
            ("great", 0.8),
            ("excellent", 1.0),
            ("amazing", 0.6),
            ("wonderful", 1.0),
            ("fantastic", 0.4),
            ("brilliant", 0.9),
            ("warm", 0.6),
            ("kind", 0.6),
            ("charming", 0.5),
            ("funny", 0.25),
            ("hilarious", 0.5),
            ("happy", 0.8),
            ("joyful", 0.8),
            ("loving", 0.6),
            ("beautiful", 0.85),
            ("confident", 0.5),
            ("fun", 0.3),
            ("exciting", 0.3),
            ("heroic", 0.6),
            ("inspiring", 0.6),
            ("successful", 0.75),
            ("talented", 0.7),
            ("smart", 0.2),
            ("friendly", 0.4),
            ("gentle", 0.3),
            ("energetic", 0.3),
            ("likable", 0.5),
            ("upbeat", 0.5),
            ("best", 1.0),
            ("love", 0.5),
            ("nice", 0.6),
        ];
        let negative = [
            ("bad", -0.7),
            ("evil", -1.0),
            ("cruel", -1.0),
            ("dark", -0.15),
            ("sad", -0.5),
            ("angry", -0.5),
            ("bitter", -0.1),
            ("violent", -0.8),
            ("terrible", -1.0),
            ("horrible", -1.0),
            ("awful", -1.0),
            ("creepy", -0.5),
            ("sinister", -0.7),
            ("menacing", -0.6),
            ("cold", -0.6),
            ("grumpy", -0.5),
            ("troubled", -0.4),
            ("desperate", -0.6),
            ("lonely", -0.5),
            ("villain", -0.5),
            ("corrupt", -0.7),
            ("ruthless", -0.8),
            ("broken", -0.4),
            ("grieving", -0.6),
            ("abusive", -0.9),
            ("jealous", -0.4),
            ("weak", -0.4),
            ("worst", -1.0),
            ("hate", -0.8),
            ("mean", -0.3),
        ];

        let mut words = HashMap::new();
        for (word, score) in positive.into_iter().chain(negative) {
            words.insert(word, score);
        }

        let negations = vec![
            "not", "no", "never", "neither", "nobody", "nothing", "none", "cannot", "cant", "dont",
            "doesnt", "didnt", "wont", "isnt", "arent", "wasnt", "werent", "hardly", "barely",
        ];

        let intensifiers = HashMap::from([
            ("very", 1.3),
            ("extremely", 1.5),
            ("really", 1.2),
            ("incredibly", 1.5),
            ("truly", 1.2),
            ("deeply", 1.3),
            ("slightly", 0.5),
            ("somewhat", 0.7),
            ("mildly", 0.6),
        ]);

        Self {
            words,
            negations,
            intensifiers,
        }
    }

    pub fn polarity(&self, word: &str) -> Option<f64> {
        self.words.get(word).copied()
    }

    fn is_negation(&self, word: &str) -> bool {
        self.negations.iter().any(|n| *n == word)
    }

    /// Lowercase words with apostrophes dropped, so "don't" reads as "dont".
    fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .replace(['\'', '\u{2019}'], "")
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl SentimentScorer for LexiconScorer {
    fn model_version(&self) -> &str {
        Self::MODEL_VERSION
    }

    fn score(&self, text: &str) -> Result<f64> {
        let tokens = Self::tokenize(text);
        let mut total = 0.0;
        let mut hits = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            let Some(mut polarity) = self.polarity(token) else {
                continue;
            };
            let window = &tokens[i.saturating_sub(MODIFIER_WINDOW)..i];
            for prev in window {
                if let Some(m) = self.intensifiers.get(prev.as_str()) {
                    polarity *= m;
                }
            }
            if window.iter().any(|w| self.is_negation(w)) {
                polarity *= NEGATION_FACTOR;
            }
            total += polarity.clamp(-1.0, 1.0);
            hits += 1;
        }

        if hits == 0 {
            return Ok(0.0);
        }
        Ok((total / hits as f64).clamp(-1.0, 1.0))
    }
}
