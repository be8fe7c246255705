use crate::sanitize::{clamp_range, clamp_ratio};
use crate::types::{AttemptRecord, DEFAULT_OPTION_COUNT, ITEM_DISCRIMINATION};

const DIFFICULTY_PER_EXTRA_OPTION: f64 = 0.15;
const DIFFICULTY_PER_RETRY: f64 = 0.1;
const MAX_DIFFICULTY_RETRIES: u32 = 5;
const DIFFICULTY_HINT_BONUS: f64 = 0.2;
const MIN_DIFFICULTY: f64 = -2.0;
const MAX_DIFFICULTY: f64 = 2.0;

/// 3PL item parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemParams {
    /// Discrimination `a`
    pub discrimination: f64,
    /// Difficulty `b`, within [-2, 2]
    pub difficulty: f64,
    /// Guessing floor `c`, within [0, 1]
    pub guessing: f64,
}

impl Default for ItemParams {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl ItemParams {
    /// Derive parameters from the item's option count and, if any, its attempt.
    ///
    /// `option_count` of `None` or zero means the options are unknown.
    pub fn new(option_count: Option<usize>, attempt: Option<&AttemptRecord>) -> Self {
        Self {
            discrimination: ITEM_DISCRIMINATION,
            difficulty: Self::estimate_difficulty(option_count, attempt),
            guessing: Self::guessing_floor(option_count),
        }
    }

    pub fn guessing_floor(option_count: Option<usize>) -> f64 {
        let options = match option_count {
            Some(count) if count > 0 => count,
            _ => DEFAULT_OPTION_COUNT,
        };
        clamp_ratio(1.0 / options.max(2) as f64)
    }

    pub fn estimate_difficulty(option_count: Option<usize>, attempt: Option<&AttemptRecord>) -> f64 {
        let mut difficulty = 0.0;
        if let Some(count) = option_count {
            difficulty += DIFFICULTY_PER_EXTRA_OPTION * count.saturating_sub(DEFAULT_OPTION_COUNT) as f64;
        }
        if let Some(attempt) = attempt {
            if let Some(retries) = attempt.retries {
                difficulty += DIFFICULTY_PER_RETRY * retries.min(MAX_DIFFICULTY_RETRIES) as f64;
            }
            if attempt.used_hints() {
                difficulty += DIFFICULTY_HINT_BONUS;
            }
        }
        clamp_range(difficulty, MIN_DIFFICULTY, MAX_DIFFICULTY, 0.0)
    }

    fn logistic(&self, theta: f64) -> f64 {
        1.0 / (1.0 + (-self.discrimination * (theta - self.difficulty)).exp())
    }

    /// `P(θ) = c + (1 - c)·σ(a(θ - b))`
    pub fn probability(&self, theta: f64) -> f64 {
        self.guessing + (1.0 - self.guessing) * self.logistic(theta)
    }

    /// `dP/dθ`
    pub fn slope(&self, theta: f64) -> f64 {
        let s = self.logistic(theta);
        (1.0 - self.guessing) * self.discrimination * s * (1.0 - s)
    }

    /// Probability with the guessing floor removed, in [0, 1]
    pub fn skill_probability(&self, theta: f64) -> f64 {
        let p = self.probability(theta);
        if p > self.guessing {
            clamp_ratio((p - self.guessing) / (1.0 - self.guessing))
        } else {
            0.0
        }
    }
}

/// Discount an observed ratio toward the skill-driven probability at `theta`.
pub fn adjust_score(option_count: Option<usize>, attempt: &AttemptRecord, theta: f64) -> f64 {
    let observed = attempt.resolve_score_ratio();
    if observed <= 0.0 {
        return 0.0;
    }

    let item = ItemParams::new(option_count, Some(attempt));
    observed * item.skill_probability(theta)
}
