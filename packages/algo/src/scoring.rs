//! Activity score aggregation.
//!
//! Every public total is derived from one per-task pass so that earned XP can
//! never exceed total XP and the breakdown always agrees with the totals.
//!
//! Per task:
//! - no attempt: baseline reward counts toward total, nothing is earned
//! - rapid guess: the task is removed from both totals
//! - otherwise: resolved ratio, IRT adjusted for multiple choice when enabled,
//!   then effort penalties, then `round_half_up(reward × ratio)`

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::ScoringOptions;
use crate::effort::apply_effort_modifiers;
use crate::irt::{adjust_score, AbilityEstimator, ItemParams, ObservedItem};
use crate::keys::AttemptLookup;
use crate::sanitize::scaled_xp;
use crate::timing::RapidGuessFilter;
use crate::types::{
    AbilityEstimate, ActivityScore, AttemptRecord, LossReason, SessionSnapshot, TaskContent,
    TaskDescriptor, TaskScoreBreakdown,
};

/// Stateless activity scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreCalculator {
    options: ScoringOptions,
    estimator: AbilityEstimator,
}

impl ScoreCalculator {
    pub fn new(options: ScoringOptions) -> Self {
        Self {
            options,
            estimator: AbilityEstimator::default(),
        }
    }

    pub fn options(&self) -> ScoringOptions {
        self.options
    }

    fn rapid_filter(&self) -> RapidGuessFilter {
        RapidGuessFilter::new(self.options.unknown_duration_is_rapid)
    }

    /// Sum of baseline rewards, for activities with no attempt data yet
    pub fn preview_total_xp(tasks: &[TaskDescriptor]) -> u32 {
        tasks.iter().map(TaskDescriptor::base_xp).sum()
    }

    /// Ability estimate from the session's non-rapid multiple-choice attempts
    pub fn estimate_ability<L>(&self, tasks: &[TaskDescriptor], lookup: &L) -> AbilityEstimate
    where
        L: AttemptLookup + ?Sized,
    {
        let filter = self.rapid_filter();
        let items: Vec<ObservedItem> = tasks
            .iter()
            .filter_map(|task| {
                let TaskContent::MultipleChoice { options } = &task.content else {
                    return None;
                };
                let attempt = lookup.find_attempt(task)?;
                if filter.is_rapid_guess(attempt) {
                    return None;
                }
                Some(ObservedItem {
                    params: ItemParams::new(Some(options.len()), Some(attempt)),
                    observed: attempt.resolve_score_ratio(),
                })
            })
            .collect();

        let estimate = self.estimator.estimate(&items);
        debug!(
            theta = estimate.theta,
            iterations = estimate.iterations,
            converged = estimate.converged,
            items = estimate.item_count,
            "ability estimated"
        );
        estimate
    }

    /// Score an activity: totals plus the per-task breakdown
    pub fn score<L>(&self, tasks: &[TaskDescriptor], lookup: &L) -> ActivityScore
    where
        L: AttemptLookup + ?Sized,
    {
        let ability = self
            .options
            .irt_enabled
            .then(|| self.estimate_ability(tasks, lookup));
        let theta = ability.map(|estimate| estimate.theta);
        let filter = self.rapid_filter();

        let breakdown: Vec<TaskScoreBreakdown> = tasks
            .iter()
            .enumerate()
            .map(|(index, task)| {
                score_task(index, task, lookup.find_attempt(task), filter, theta)
            })
            .collect();

        let total_xp: u32 = breakdown.iter().map(|entry| entry.total_xp).sum();
        let earned_xp: u32 = breakdown.iter().map(|entry| entry.earned_xp).sum();
        debug!(earned_xp, total_xp, tasks = tasks.len(), "activity scored");

        ActivityScore {
            earned_xp,
            total_xp,
            ability,
            breakdown,
        }
    }

    pub fn earned_xp<L>(&self, tasks: &[TaskDescriptor], lookup: &L) -> u32
    where
        L: AttemptLookup + ?Sized,
    {
        self.score(tasks, lookup).earned_xp
    }

    pub fn total_xp<L>(&self, tasks: &[TaskDescriptor], lookup: &L) -> u32
    where
        L: AttemptLookup + ?Sized,
    {
        self.score(tasks, lookup).total_xp
    }

    pub fn task_breakdown<L>(&self, tasks: &[TaskDescriptor], lookup: &L) -> Vec<TaskScoreBreakdown>
    where
        L: AttemptLookup + ?Sized,
    {
        self.score(tasks, lookup).breakdown
    }

    /// Human readable summary; `formatter` receives `(score_xp, earned_xp, total_xp)`
    pub fn summary<L, F>(&self, tasks: &[TaskDescriptor], lookup: &L, formatter: F) -> String
    where
        L: AttemptLookup + ?Sized,
        F: FnOnce(u32, u32, u32) -> String,
    {
        let score = self.score(tasks, lookup);
        formatter(score.earned_xp, score.earned_xp, score.total_xp)
    }

    /// Score independent sessions in parallel, preserving input order
    pub fn score_sessions(&self, sessions: &[SessionSnapshot]) -> Vec<ActivityScore> {
        sessions
            .par_iter()
            .map(|session| self.score(&session.tasks, &session.attempts))
            .collect()
    }
}

fn score_task(
    index: usize,
    task: &TaskDescriptor,
    attempt: Option<&AttemptRecord>,
    filter: RapidGuessFilter,
    theta: Option<f64>,
) -> TaskScoreBreakdown {
    let reward = task.base_xp();
    let entry = |total_xp: u32, earned_xp: u32, loss_reason: LossReason, score_ratio: f64| {
        TaskScoreBreakdown {
            index,
            task_id: task.id.clone(),
            kind: task.kind(),
            total_xp,
            earned_xp,
            lost_xp: total_xp.saturating_sub(earned_xp),
            loss_reason,
            rapid_guess: loss_reason == LossReason::RapidGuess,
            score_ratio,
        }
    };

    let Some(attempt) = attempt else {
        trace!(index, "task not attempted");
        return entry(reward, 0, LossReason::NotAttempted, 0.0);
    };

    if filter.is_rapid_guess(attempt) {
        trace!(index, time_spent = ?attempt.time_spent, "rapid guess excluded");
        return entry(0, 0, LossReason::RapidGuess, 0.0);
    }

    let mut ratio = attempt.resolve_score_ratio();
    if let (Some(theta), TaskContent::MultipleChoice { options }) = (theta, &task.content) {
        ratio = adjust_score(Some(options.len()), attempt, theta);
    }
    let ratio = apply_effort_modifiers(ratio, attempt);
    let earned = scaled_xp(reward, ratio);

    trace!(index, ratio, earned, reward, "task scored");
    entry(reward, earned, loss_reason(reward - earned, ratio), ratio)
}

fn loss_reason(lost_xp: u32, ratio: f64) -> LossReason {
    if lost_xp == 0 {
        LossReason::None
    } else if ratio <= 0.0 {
        LossReason::Incorrect
    } else if ratio < 1.0 {
        LossReason::PartiallyCorrect
    } else {
        LossReason::None
    }
}
