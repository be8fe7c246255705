//! Common Types and Constants
//!
//! Shared data structures used across all scoring modules.

use std::collections::HashMap;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::sanitize::clamp_ratio;

// ==================== Constants ====================

/// Baseline XP for task kinds without a dedicated reward
pub const DEFAULT_TASK_XP: u32 = 10;

/// Elapsed time (seconds, inclusive) at or below which an attempt is a rapid guess
pub const RAPID_GUESS_THRESHOLD_SECS: u64 = 1;

/// Option count assumed for multiple-choice items that list no options
pub const DEFAULT_OPTION_COUNT: usize = 4;

/// Fixed 3PL discrimination shared by all items
pub const ITEM_DISCRIMINATION: f64 = 1.2;

/// Gradient ascent iteration cap for the ability estimate
pub const ABILITY_MAX_ITERATIONS: u32 = 15;

/// Gradient ascent step size
pub const ABILITY_LEARNING_RATE: f64 = 0.8;

/// Step magnitude below which the ability estimate has converged
pub const ABILITY_CONVERGENCE_EPSILON: f64 = 1e-5;

/// Multiplier applied when hints were used
pub const HINT_PENALTY_FACTOR: f64 = 0.75;

/// Ratio lost per retry
pub const RETRY_PENALTY_STEP: f64 = 0.15;

/// Retries beyond this count are not penalized further
pub const MAX_PENALIZED_RETRIES: u32 = 4;

// ==================== Task Types ====================

/// Task kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskKind {
    MultipleChoice,
    TrueFalse,
    FillInBlank,
    MatchingPair,
    Ordering,
    SpotTheError,
    CodingChallenge,
    InfoCard,
    Unknown,
}

impl TaskKind {
    pub fn parse(s: &str) -> Self {
        let normalized = s
            .trim()
            .to_uppercase()
            .replace(|c: char| c == '-' || c.is_whitespace(), "_");
        match normalized.as_str() {
            "MULTIPLE_CHOICE" => Self::MultipleChoice,
            "TRUE_FALSE" => Self::TrueFalse,
            "FILL_IN_BLANK" | "FILL_IN_THE_BLANK" => Self::FillInBlank,
            "MATCHING_PAIR" => Self::MatchingPair,
            "ORDERING" => Self::Ordering,
            "SPOT_THE_ERROR" => Self::SpotTheError,
            "CODING_CHALLENGE" => Self::CodingChallenge,
            "INFO_CARD" => Self::InfoCard,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "MULTIPLE_CHOICE",
            Self::TrueFalse => "TRUE_FALSE",
            Self::FillInBlank => "FILL_IN_BLANK",
            Self::MatchingPair => "MATCHING_PAIR",
            Self::Ordering => "ORDERING",
            Self::SpotTheError => "SPOT_THE_ERROR",
            Self::CodingChallenge => "CODING_CHALLENGE",
            Self::InfoCard => "INFO_CARD",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Baseline XP awarded for a fully correct attempt
    pub fn base_xp(&self) -> u32 {
        match self {
            Self::MultipleChoice => 20,
            Self::TrueFalse => 10,
            Self::FillInBlank => 15,
            Self::MatchingPair => 25,
            Self::Ordering => 25,
            Self::SpotTheError => 30,
            Self::CodingChallenge => 40,
            Self::InfoCard => 5,
            Self::Unknown => DEFAULT_TASK_XP,
        }
    }
}

/// Kind-specific task payload
///
/// Tagged by `type` in JSON. Tags this engine does not know deserialize to
/// [`TaskContent::Unknown`] instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskContent {
    MultipleChoice {
        #[serde(default)]
        options: Vec<String>,
    },
    TrueFalse,
    FillInBlank,
    MatchingPair,
    Ordering,
    SpotTheError {
        #[serde(default)]
        options: Vec<String>,
    },
    CodingChallenge,
    InfoCard,
    #[serde(other)]
    Unknown,
}

impl TaskContent {
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::MultipleChoice { .. } => TaskKind::MultipleChoice,
            Self::TrueFalse => TaskKind::TrueFalse,
            Self::FillInBlank => TaskKind::FillInBlank,
            Self::MatchingPair => TaskKind::MatchingPair,
            Self::Ordering => TaskKind::Ordering,
            Self::SpotTheError { .. } => TaskKind::SpotTheError,
            Self::CodingChallenge => TaskKind::CodingChallenge,
            Self::InfoCard => TaskKind::InfoCard,
            Self::Unknown => TaskKind::Unknown,
        }
    }

    /// Number of listed answer options, if the kind has any
    pub fn option_count(&self) -> Option<usize> {
        match self {
            Self::MultipleChoice { options } | Self::SpotTheError { options } => {
                Some(options.len())
            }
            _ => None,
        }
    }
}

/// Task descriptor, immutable for the duration of a scoring call
///
/// Decoding never fails on the kind tag: a missing, null or non-string
/// `type` yields [`TaskContent::Unknown`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub content: TaskContent,
}

impl TaskDescriptor {
    pub fn new(content: TaskContent) -> Self {
        Self {
            id: None,
            title: None,
            description: None,
            status: None,
            content,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn multiple_choice<S: Into<String>>(options: impl IntoIterator<Item = S>) -> Self {
        Self::new(TaskContent::MultipleChoice {
            options: options.into_iter().map(Into::into).collect(),
        })
    }

    pub fn kind(&self) -> TaskKind {
        self.content.kind()
    }

    pub fn base_xp(&self) -> u32 {
        self.kind().base_xp()
    }
}

fn take_text<E: de::Error>(
    fields: &mut Map<String, Value>,
    key: &str,
) -> Result<Option<String>, E> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Option::<String>::deserialize(value).map_err(E::custom),
    }
}

impl<'de> Deserialize<'de> for TaskDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;

        let id = take_text::<D::Error>(&mut fields, "id")?;
        let title = take_text::<D::Error>(&mut fields, "title")?;
        let description = take_text::<D::Error>(&mut fields, "description")?;
        let status = take_text::<D::Error>(&mut fields, "status")?;

        let tagged = matches!(fields.get("type"), Some(Value::String(_)));
        let content = if tagged {
            TaskContent::deserialize(Value::Object(fields))
                .map_err(<D::Error as de::Error>::custom)?
        } else {
            TaskContent::Unknown
        };

        Ok(Self {
            id,
            title,
            description,
            status,
            content,
        })
    }
}

// ==================== Attempt Types ====================

/// One learner's interaction outcome for one task
///
/// Every field is optional; ratios are clamped wherever they are consumed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempted_at: Option<String>,
    /// Elapsed time, `"mm:ss"` or free text containing seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hints_used: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_ratio: Option<f64>,
}

impl AttemptRecord {
    pub fn with_time_spent(mut self, time_spent: impl Into<String>) -> Self {
        self.time_spent = Some(time_spent.into());
        self
    }

    pub fn with_score_ratio(mut self, ratio: f64) -> Self {
        self.score_ratio = Some(ratio);
        self
    }

    pub fn with_success(mut self, success: bool) -> Self {
        self.success = Some(success);
        self
    }

    pub fn with_hints_used(mut self, hints_used: bool) -> Self {
        self.hints_used = Some(hints_used);
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn used_hints(&self) -> bool {
        self.hints_used == Some(true)
    }

    pub fn retry_count(&self) -> u32 {
        self.retries.unwrap_or(0)
    }

    /// Completion ratio, falling back to the success flag
    pub fn resolve_completion_ratio(&self) -> f64 {
        if let Some(ratio) = self.completion_ratio {
            return clamp_ratio(ratio);
        }
        if self.success == Some(true) {
            1.0
        } else {
            0.0
        }
    }

    /// Score ratio with fallback: score ratio, completion ratio, success flag
    pub fn resolve_score_ratio(&self) -> f64 {
        match self.score_ratio {
            Some(ratio) => clamp_ratio(ratio),
            None => self.resolve_completion_ratio(),
        }
    }

    pub fn is_completed(&self) -> bool {
        if self.success == Some(true) {
            return true;
        }

        let completion = self.resolve_completion_ratio();
        if completion >= 1.0 {
            return true;
        }
        if completion > 0.0 && self.score_ratio.map_or(true, |ratio| ratio > 0.0) {
            return true;
        }

        self.score_ratio.map_or(false, |ratio| ratio > 0.0)
    }

    pub fn is_fully_correct(&self) -> bool {
        self.resolve_score_ratio() >= 1.0
    }
}

/// In-memory snapshot of one activity session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub tasks: Vec<TaskDescriptor>,
    /// Attempts keyed by stable task key (see [`crate::keys::build_key`])
    #[serde(default)]
    pub attempts: HashMap<String, AttemptRecord>,
}

impl SessionSnapshot {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

// ==================== Result Types ====================

/// Why a task's earned XP fell short of its total XP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LossReason {
    None,
    NotAttempted,
    Incorrect,
    PartiallyCorrect,
    RapidGuess,
}

impl LossReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::NotAttempted => "NOT_ATTEMPTED",
            Self::Incorrect => "INCORRECT",
            Self::PartiallyCorrect => "PARTIALLY_CORRECT",
            Self::RapidGuess => "RAPID_GUESS",
        }
    }
}

/// Per-task scoring diagnostic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskScoreBreakdown {
    /// Position of the task in the scored collection
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub kind: TaskKind,
    pub total_xp: u32,
    pub earned_xp: u32,
    pub lost_xp: u32,
    pub loss_reason: LossReason,
    pub rapid_guess: bool,
    /// Final ratio after IRT and effort adjustment, 0 when not counted
    pub score_ratio: f64,
}

/// Session ability estimate diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityEstimate {
    pub theta: f64,
    pub iterations: u32,
    pub converged: bool,
    pub item_count: usize,
}

impl Default for AbilityEstimate {
    fn default() -> Self {
        Self {
            theta: 0.0,
            iterations: 0,
            converged: true,
            item_count: 0,
        }
    }
}

/// Outcome of scoring one activity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityScore {
    pub earned_xp: u32,
    pub total_xp: u32,
    /// Present only when the IRT path ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ability: Option<AbilityEstimate>,
    pub breakdown: Vec<TaskScoreBreakdown>,
}

impl ActivityScore {
    pub fn lost_xp(&self) -> u32 {
        self.total_xp.saturating_sub(self.earned_xp)
    }
}
