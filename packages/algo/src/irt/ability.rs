use crate::irt::item::ItemParams;
use crate::sanitize::has_invalid_values;
use crate::types::{
    AbilityEstimate, ABILITY_CONVERGENCE_EPSILON, ABILITY_LEARNING_RATE, ABILITY_MAX_ITERATIONS,
};

/// A calibrated item paired with its observed score ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservedItem {
    pub params: ItemParams,
    /// Clamped resolved score ratio, used as a continuous target
    pub observed: f64,
}

impl ObservedItem {
    fn is_valid(&self) -> bool {
        !has_invalid_values(&[
            self.observed,
            self.params.discrimination,
            self.params.difficulty,
            self.params.guessing,
        ])
    }
}

/// Gradient ascent ability estimator
#[derive(Debug, Clone, Copy)]
pub struct AbilityEstimator {
    pub max_iterations: u32,
    pub learning_rate: f64,
    pub epsilon: f64,
}

impl Default for AbilityEstimator {
    fn default() -> Self {
        Self {
            max_iterations: ABILITY_MAX_ITERATIONS,
            learning_rate: ABILITY_LEARNING_RATE,
            epsilon: ABILITY_CONVERGENCE_EPSILON,
        }
    }
}

impl AbilityEstimator {
    pub fn estimate(&self, items: &[ObservedItem]) -> AbilityEstimate {
        let valid: Vec<&ObservedItem> = items.iter().filter(|item| item.is_valid()).collect();
        if valid.len() < items.len() {
            tracing::warn!(
                skipped = items.len() - valid.len(),
                "non-finite item values excluded from ability estimate"
            );
        }
        if valid.is_empty() {
            return AbilityEstimate::default();
        }

        let mut theta = 0.0;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            let gradient: f64 = valid
                .iter()
                .map(|item| (item.observed - item.params.probability(theta)) * item.params.slope(theta))
                .sum();
            let step = self.learning_rate * gradient;
            theta += step;
            iterations += 1;

            if step.abs() < self.epsilon {
                converged = true;
                break;
            }
        }

        if !theta.is_finite() {
            tracing::warn!(theta, "ability estimate diverged, falling back to 0");
            theta = 0.0;
        }

        AbilityEstimate {
            theta,
            iterations,
            converged,
            item_count: valid.len(),
        }
    }
}

/// Estimate ability with the default constants
pub fn estimate_ability(items: &[ObservedItem]) -> AbilityEstimate {
    AbilityEstimator::default().estimate(items)
}
