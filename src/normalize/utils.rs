use once_cell::sync::Lazy;
use regex::Regex;

/// First number in a free-text amount, with optional thousands separators.
static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?").expect("valid regex"));

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Lowercased alphanumeric words of `text`.
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// True when `phrase`'s words occur contiguously in `haystack`.
pub fn contains_phrase(haystack: &[String], phrase: &[&str]) -> bool {
    !phrase.is_empty()
        && haystack
            .windows(phrase.len())
            .any(|w| w.iter().zip(phrase).all(|(a, b)| a == b))
}

/// Read a rate field. Plain numbers parse directly; anything else falls back
/// to the first number in the text (`"$1,200/day"` → 1200).
/// Only finite, strictly positive values survive.
pub fn parse_rate(raw: &str) -> Option<f64> {
    let s = clean_str(raw);
    if s.is_empty() {
        return None;
    }
    let value = match s.parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            let m = NUMBER_RE.find(&s)?;
            m.as_str().replace(',', "").parse::<f64>().ok()?
        }
    };
    (value.is_finite() && value > 0.0).then_some(value)
}
