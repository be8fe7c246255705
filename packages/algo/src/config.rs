use serde::{Deserialize, Serialize};

/// Per-call scoring switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringOptions {
    /// Run the IRT adjustment for multiple-choice items
    pub irt_enabled: bool,
    /// Treat attempts with missing or unparsable timing as rapid guesses
    pub unknown_duration_is_rapid: bool,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            irt_enabled: true,
            unknown_duration_is_rapid: false,
        }
    }
}

impl ScoringOptions {
    pub fn with_irt(irt_enabled: bool) -> Self {
        Self {
            irt_enabled,
            ..Self::default()
        }
    }

    /// Read switches from the environment. Only callers use this; the scorer
    /// never consults the environment itself.
    pub fn from_env() -> Self {
        let mut options = Self::default();

        if let Ok(val) = std::env::var("XP_IRT_SCORING_ENABLED") {
            options.irt_enabled = parse_flag(&val).unwrap_or(options.irt_enabled);
        }
        if let Ok(val) = std::env::var("XP_UNKNOWN_DURATION_IS_RAPID") {
            options.unknown_duration_is_rapid =
                parse_flag(&val).unwrap_or(options.unknown_duration_is_rapid);
        }

        options
    }
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
