// src/privacy.rs

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::aggregate::rounding::round_half_up;
use crate::aggregate::BucketStats;
use crate::config::NoiseConfig;
use crate::types::BucketKey;

/// Zero-mean Laplace noise with scale `1 / epsilon` (count sensitivity is 1).
pub struct LaplaceNoise {
    scale: f64,
    rng: StdRng,
}

impl LaplaceNoise {
    pub fn new(epsilon: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            scale: 1.0 / epsilon,
            rng,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Inverse-CDF draw.
    pub fn sample(&mut self) -> f64 {
        loop {
            let u: f64 = self.rng.gen_range(-0.5..0.5);
            let tail = 1.0 - 2.0 * u.abs();
            if tail > 0.0 {
                return -self.scale * u.signum() * tail.ln();
            }
        }
    }

    /// Add noise to a count, round, and keep it in `[0, max]`.
    fn perturb(&mut self, count: u64, max: u64) -> u64 {
        let noisy = round_half_up(count as f64 + self.sample());
        noisy.clamp(0.0, max as f64) as u64
    }
}

/// Drops buckets under the privacy floor, optionally perturbing counts first.
pub struct PrivacyFilter {
    min_bucket_size: u64,
    noise: Option<LaplaceNoise>,
}

/// What survived the filter, plus how many buckets were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Filtered {
    pub kept: BTreeMap<BucketKey, BucketStats>,
    pub suppressed: usize,
}

impl PrivacyFilter {
    pub fn new(min_bucket_size: u64, noise: &NoiseConfig) -> Self {
        Self {
            min_bucket_size,
            noise: noise
                .enabled
                .then(|| LaplaceNoise::new(noise.epsilon, noise.seed)),
        }
    }

    pub fn min_bucket_size(&self) -> u64 {
        self.min_bucket_size
    }

    pub fn perturbs(&self) -> bool {
        self.noise.is_some()
    }

    /// Perturb (when enabled) and then filter. Buckets are visited in key
    /// order so a seeded run is reproducible. Medians and sentiment are never
    /// touched.
    pub fn apply(&mut self, stats: BTreeMap<BucketKey, BucketStats>) -> Filtered {
        let total = stats.len();
        let mut kept = BTreeMap::new();

        for (key, mut bucket) in stats {
            if let Some(noise) = self.noise.as_mut() {
                // role_count has no natural upper bound; cap it generously
                let role_count = noise.perturb(bucket.role_count, u64::MAX >> 11);
                bucket.lead_count = noise.perturb(bucket.lead_count, role_count);
                bucket.union_count = noise.perturb(bucket.union_count, role_count);
                bucket.ai_count = noise.perturb(bucket.ai_count, role_count);
                bucket.role_count = role_count;
                bucket.recompute_shares();
            }

            if bucket.role_count < self.min_bucket_size {
                debug!(
                    date = %key.date_utc,
                    region = %key.region_code,
                    proj_type = %key.proj_type_code,
                    count = bucket.role_count,
                    "suppressed bucket under privacy floor"
                );
                continue;
            }
            kept.insert(key, bucket);
        }

        let suppressed = total - kept.len();
        info!(
            min_bucket_size = self.min_bucket_size,
            noise = self.perturbs(),
            kept = kept.len(),
            suppressed,
            "applied privacy floor"
        );
        Filtered { kept, suppressed }
    }
}
