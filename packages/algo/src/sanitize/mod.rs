//! Data Sanitization
//!
//! Numerical guards applied wherever upstream attempt data is consumed.
//!
//! Functions:
//! - Ratio clamping (non-finite values collapse to a safe bound)
//! - Range clamping for model parameters
//! - XP rounding

/// Check whether any value is NaN or infinite
pub fn has_invalid_values(arr: &[f64]) -> bool {
    arr.iter().any(|&x| x.is_nan() || x.is_infinite())
}

/// Clamp a ratio into [0, 1]
///
/// NaN maps to 0, +Inf to 1 and -Inf to 0.
pub fn clamp_ratio(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Clamp into `[min, max]`, mapping NaN to `fallback`
pub fn clamp_range(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        return fallback.clamp(min, max);
    }
    value.clamp(min, max)
}

/// `reward × ratio` rounded half-up, with the ratio clamped first
pub fn scaled_xp(reward: u32, ratio: f64) -> u32 {
    let scaled = f64::from(reward) * clamp_ratio(ratio);
    // scaled is within [0, reward]
    (scaled + 0.5).floor() as u32
}
