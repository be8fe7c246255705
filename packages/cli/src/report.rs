use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};
use xp_scoring::{ActivityScore, ScoreCalculator, SessionSnapshot};

use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub source: PathBuf,
    pub summary: String,
    #[serde(flatten)]
    pub score: ActivityScore,
}

pub fn load_session(path: &Path) -> Result<SessionSnapshot> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    SessionSnapshot::from_json(&raw).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load every input, score them in parallel and pair the results with their source
pub fn score_files(calc: &ScoreCalculator, inputs: &[PathBuf]) -> Result<Vec<SessionReport>> {
    if inputs.is_empty() {
        return Err(CliError::MissingInput);
    }

    let sessions = inputs
        .iter()
        .map(|path| load_session(path))
        .collect::<Result<Vec<_>>>()?;
    debug!(sessions = sessions.len(), "Sessions loaded");

    let scores = calc.score_sessions(&sessions);
    let reports = inputs
        .iter()
        .zip(scores)
        .map(|(path, score)| SessionReport {
            source: path.clone(),
            summary: summary_line(&score),
            score,
        })
        .collect();

    Ok(reports)
}

pub fn summary_line(score: &ActivityScore) -> String {
    format!("{}/{} XP", score.earned_xp, score.total_xp)
}

pub fn render(reports: &[SessionReport], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(reports)?),
        OutputFormat::Text => Ok(render_text(reports)),
    }
}

fn render_text(reports: &[SessionReport]) -> String {
    let mut out = String::new();
    for report in reports {
        let _ = writeln!(out, "{}: {}", report.source.display(), report.summary);
        if let Some(ability) = report.score.ability {
            let _ = writeln!(
                out,
                "  ability theta={:.3} items={} iterations={}",
                ability.theta, ability.item_count, ability.iterations
            );
        }
        for entry in &report.score.breakdown {
            let _ = writeln!(
                out,
                "  #{:<3} {:<18} {:>3}/{:<3} {}",
                entry.index,
                entry.kind.as_str(),
                entry.earned_xp,
                entry.total_xp,
                entry.loss_reason.as_str()
            );
        }
    }
    out
}

pub fn run(config: &Config) -> Result<String> {
    let calc = ScoreCalculator::new(config.scoring);
    let reports = score_files(&calc, &config.inputs)?;

    let earned: u32 = reports.iter().map(|r| r.score.earned_xp).sum();
    let total: u32 = reports.iter().map(|r| r.score.total_xp).sum();
    info!(sessions = reports.len(), earned, total, "Scoring complete");

    render(&reports, config.output)
}
