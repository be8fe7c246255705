//! # xp-scoring - adaptive activity scoring engine
//!
//! Converts learner attempt records into experience points (XP) that resist
//! lucky guesses and low-effort behaviour:
//!
//! - **Baseline rewards** - fixed XP per task kind
//! - **Rapid-guess filter** - attempts answered within a second are dropped
//! - **Ability calibration** - a per-session 3PL (IRT) heuristic for multiple choice
//! - **Effort penalties** - multiplicative discounts for hints and retries
//! - **Aggregation** - earned/total XP plus a per-task diagnostic breakdown
//!
//! ## Design
//!
//! - **Pure** - no I/O, no global state; every call works on a caller snapshot
//! - **Total** - malformed attempt fields fall back to defaults instead of erroring
//! - **Deterministic** - identical inputs always yield identical scores
//!
//! ## Modules
//!
//! - [`types`] - task/attempt model, results and constants
//! - [`timing`] - elapsed time parsing and rapid-guess detection
//! - [`irt`] - item parameters, ability estimate and score adjustment
//! - [`effort`] - hint and retry penalties
//! - [`scoring`] - the aggregator
//! - [`keys`] - task-to-attempt matching
//! - [`config`] - per-call switches
//! - [`sanitize`] - numeric guards
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use xp_scoring::{AttemptRecord, ScoreCalculator, ScoringOptions, TaskContent, TaskDescriptor};
//!
//! let tasks = vec![
//!     TaskDescriptor::multiple_choice(["a", "b", "c", "d"]).with_id("q1"),
//!     TaskDescriptor::new(TaskContent::InfoCard).with_id("card"),
//! ];
//! let mut attempts = HashMap::new();
//! attempts.insert(
//!     "q1".to_string(),
//!     AttemptRecord::default().with_score_ratio(1.0).with_time_spent("00:30"),
//! );
//!
//! let calc = ScoreCalculator::new(ScoringOptions::with_irt(false));
//! let score = calc.score(&tasks, &attempts);
//! assert_eq!((score.earned_xp, score.total_xp), (20, 25));
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod effort;
pub mod irt;
pub mod keys;
pub mod sanitize;
pub mod scoring;
pub mod timing;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use config::ScoringOptions;

pub use effort::apply_effort_modifiers;

pub use irt::{adjust_score, estimate_ability, AbilityEstimator, ItemParams, ObservedItem};

pub use keys::{build_key, find_attempt, put_attempt, AttemptLookup, KeyedLookup};

pub use scoring::ScoreCalculator;

pub use timing::{is_rapid_guess, parse_elapsed_seconds, RapidGuessFilter};
