//! Command line front end for the xp-scoring engine
//!
//! Reads session snapshots from JSON files and prints their scores.

pub mod config;
pub mod error;
pub mod logging;
pub mod report;

pub use config::{Config, OutputFormat};
pub use error::{CliError, Result};
pub use report::{load_session, render, run, score_files, summary_line, SessionReport};
