//! Item response scoring for multiple-choice items.
//!
//! A per-session 3PL heuristic: items get fixed discrimination, a guessing
//! floor from their option count and a difficulty nudged by effort signals.
//! The session ability is fitted by gradient ascent with continuous score
//! ratios as pseudo-targets, then used to discount lucky guesses.

pub mod ability;
pub mod item;

pub use ability::{estimate_ability, AbilityEstimator, ObservedItem};
pub use item::{adjust_score, ItemParams};
