//! Bucket odds engine
//!
//! Keeps bucket multipliers a continuously-updating function of observed
//! landing frequency, so the probability-weighted expected return converges
//! to `1 - house_edge` regardless of the true physical landing distribution.
//! Buckets hit often drift toward low multipliers; rarely-hit edge buckets
//! float high.

use crate::round2;

use super::state::Bucket;

/// Empirical landing probability for one bucket.
///
/// A bucket with no landings yet gets a half-count floor of
/// `1 / (2 * total_drops)` rather than zero, keeping its multiplier high but
/// bounded. `None` before the first drop - probabilities are undefined then.
pub fn empirical_probability(landings: u32, total_drops: u32) -> Option<f64> {
    if total_drops == 0 {
        return None;
    }
    if landings == 0 {
        Some(1.0 / (2.0 * f64::from(total_drops)))
    } else {
        Some(f64::from(landings) / f64::from(total_drops))
    }
}

/// Recompute every bucket's multiplier from its empirical probability:
/// `m_i = round2((1 - house_edge) / (p_i * n))`.
///
/// A no-op before the first drop; buckets keep their pre-seeded baseline.
pub fn recompute_multipliers(buckets: &mut [Bucket], house_edge: f64) {
    let n = buckets.len() as f64;
    let expected_return = 1.0 - house_edge;
    for bucket in buckets.iter_mut() {
        let Some(p) = empirical_probability(bucket.landings, bucket.total_drops) else {
            continue;
        };
        bucket.multiplier = round2(expected_return / (p * n));
    }
}
