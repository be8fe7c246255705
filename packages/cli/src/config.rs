use std::path::PathBuf;

use xp_scoring::ScoringOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "text" | "plain" => Self::Text,
            _ => Self::Json,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub output: OutputFormat,
    pub scoring: ScoringOptions,
    pub inputs: Vec<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_args(std::env::args().skip(1))
    }

    /// Environment settings plus the session files given on the command line
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let output = std::env::var("XP_OUTPUT")
            .map(|value| OutputFormat::parse(&value))
            .unwrap_or(OutputFormat::Json);

        let inputs = args.into_iter().map(Into::into).map(PathBuf::from).collect();

        Self {
            log_level,
            output,
            scoring: ScoringOptions::from_env(),
            inputs,
        }
    }
}
