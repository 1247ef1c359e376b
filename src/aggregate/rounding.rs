//! Rounding rules for pulse statistics. Ties round away from zero.
//!
//! Inputs are products of float division, so a decimal tie like 0.15 may land
//! a hair below 0.5 in binary. Anything within `TIE_EPSILON` of a midpoint is
//! treated as the midpoint.

const TIE_EPSILON: f64 = 1e-9;

/// Round to the nearest integer, midpoints away from zero.
pub fn round_half_up(q: f64) -> f64 {
    let t = q.trunc();
    let frac = (q - t).abs();
    if (frac - 0.5).abs() < TIE_EPSILON {
        t + q.signum()
    } else {
        q.round()
    }
}

/// Round to `dp` decimal places.
pub fn round_dp(x: f64, dp: i32) -> f64 {
    let scale = 10f64.powi(dp);
    zero_sign(round_half_up(x * scale) / scale)
}

/// Round to the nearest multiple of `step`.
pub fn round_to_multiple(x: f64, step: f64) -> f64 {
    zero_sign(round_half_up(x / step) * step)
}

/// Round to the nearest 0.05.
pub fn round_to_twentieth(x: f64) -> f64 {
    zero_sign(round_half_up(x * 20.0) / 20.0)
}

/// Sentiment mean → nearest 0.05, then clamped to [-1, 1].
pub fn clamp_sentiment(mean: f64) -> f64 {
    round_to_twentieth(mean).clamp(-1.0, 1.0)
}

/// `part / whole` clamped to [0, 1] and rounded to one decimal.
/// `whole == 0` yields 0.
pub fn share(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let ratio = (part as f64 / whole as f64).clamp(0.0, 1.0);
    round_dp(ratio, 1)
}

/// Median with the even-length case averaged. `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Collapse -0.0 to 0.0 so it never prints as "-0.00".
fn zero_sign(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x
    }
}
