use crate::config::KeywordMatch;
use crate::normalize::utils::{contains_phrase, words};

/// Flags role descriptions that touch on AI themes.
///
/// Under [`KeywordMatch::Substring`] "said" and "maid" count as "ai". That
/// is the accepted cost of the substring heuristic; switch to
/// [`KeywordMatch::WholeWord`] to avoid it.
#[derive(Debug, Clone)]
pub struct AiThemeDetector {
    keywords: Vec<String>,
    policy: KeywordMatch,
}

impl Default for AiThemeDetector {
    fn default() -> Self {
        Self::new(
            vec!["ai".into(), "robot".into(), "android".into()],
            KeywordMatch::Substring,
        )
    }
}

impl AiThemeDetector {
    /// `keywords` must already be trimmed and lowercased.
    pub fn new(keywords: Vec<String>, policy: KeywordMatch) -> Self {
        Self { keywords, policy }
    }

    pub fn policy(&self) -> KeywordMatch {
        self.policy
    }

    pub fn is_ai_theme(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        match self.policy {
            KeywordMatch::Substring => self.keywords.iter().any(|k| lower.contains(k.as_str())),
            KeywordMatch::WholeWord => {
                let hay = words(&lower);
                self.keywords.iter().any(|k| {
                    let phrase: Vec<&str> = k.split_whitespace().collect();
                    contains_phrase(&hay, &phrase)
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_policy() {
        let d = AiThemeDetector::default();
        assert!(d.is_ai_theme("Seeking an AI robot voice actor"));
        assert!(d.is_ai_theme("Android butler, deadpan"));
        // accepted false positive
        assert!(d.is_ai_theme("said nothing"));
        assert!(!d.is_ai_theme("A grumpy neighbour"));
        assert!(!d.is_ai_theme(""));
    }

    #[test]
    fn whole_word_policy() {
        let d = AiThemeDetector::new(
            vec!["ai".into(), "robot".into(), "machine learning".into()],
            KeywordMatch::WholeWord,
        );
        assert!(d.is_ai_theme("Seeking an AI robot voice actor"));
        assert!(d.is_ai_theme("expert in Machine Learning"));
        assert!(!d.is_ai_theme("said nothing"));
        assert!(!d.is_ai_theme("robotics lab tech"));
    }
}
