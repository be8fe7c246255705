//! Rapid-guess detection from recorded time on task.
//!
//! An attempt answered within a second is treated as a low-effort guess and
//! removed from scoring entirely.

use crate::types::{AttemptRecord, RAPID_GUESS_THRESHOLD_SECS};

/// Parse free-form elapsed time into whole seconds.
///
/// `"m:s"` is read as minutes and seconds; anything else keeps only its digits.
/// Returns `None` when nothing usable is present.
pub fn parse_elapsed_seconds(time_spent: &str) -> Option<u64> {
    let trimmed = time_spent.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.contains(':') {
        let parts: Vec<&str> = trimmed.split(':').collect();
        if let [minutes, seconds] = parts.as_slice() {
            let minutes = minutes.parse::<i64>().ok()?;
            let seconds = seconds.parse::<i64>().ok()?;
            let total = minutes.checked_mul(60)?.checked_add(seconds)?;
            return Some(total.max(0) as u64);
        }
    }

    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u64>().ok()
}

/// Resolved elapsed seconds of an attempt, `None` when unknown
pub fn resolve_seconds(attempt: &AttemptRecord) -> Option<u64> {
    attempt.time_spent.as_deref().and_then(parse_elapsed_seconds)
}

/// Rapid-guess filter
#[derive(Debug, Clone, Copy, Default)]
pub struct RapidGuessFilter {
    /// Classify attempts without usable timing as rapid guesses
    pub unknown_is_rapid: bool,
}

impl RapidGuessFilter {
    pub fn new(unknown_is_rapid: bool) -> Self {
        Self { unknown_is_rapid }
    }

    pub fn is_rapid_guess(&self, attempt: &AttemptRecord) -> bool {
        match resolve_seconds(attempt) {
            Some(seconds) => seconds <= RAPID_GUESS_THRESHOLD_SECS,
            None => self.unknown_is_rapid,
        }
    }
}

/// Rapid-guess check with unknown durations treated as genuine attempts
pub fn is_rapid_guess(attempt: &AttemptRecord) -> bool {
    RapidGuessFilter::default().is_rapid_guess(attempt)
}
