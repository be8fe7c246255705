use std::process::ExitCode;

use xp_scoring_cli::{logging, run, Config};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.log_level);

    tracing::info!(
        inputs = config.inputs.len(),
        irt_enabled = config.scoring.irt_enabled,
        unknown_duration_is_rapid = config.scoring.unknown_duration_is_rapid,
        "Starting xp-score"
    );

    match run(&config) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Scoring failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
