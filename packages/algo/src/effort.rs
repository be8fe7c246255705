//! Effort penalties for hint usage and retries.

use crate::sanitize::clamp_ratio;
use crate::types::{AttemptRecord, HINT_PENALTY_FACTOR, MAX_PENALIZED_RETRIES, RETRY_PENALTY_STEP};

/// Multiplier for a retry count, `max(0, 1 - 0.15 × min(retries, 4))`
pub fn retry_multiplier(retries: u32) -> f64 {
    if retries == 0 {
        return 1.0;
    }
    let penalty = RETRY_PENALTY_STEP * f64::from(retries.min(MAX_PENALIZED_RETRIES));
    (1.0 - penalty).max(0.0)
}

/// Apply the hint penalty, then the retry penalty, and clamp to [0, 1].
pub fn apply_effort_modifiers(ratio: f64, attempt: &AttemptRecord) -> f64 {
    let mut adjusted = ratio;
    if attempt.used_hints() {
        adjusted *= HINT_PENALTY_FACTOR;
    }
    adjusted *= retry_multiplier(attempt.retry_count());
    clamp_ratio(adjusted)
}
