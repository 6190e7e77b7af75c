//! Error types for the launcher

use std::path::PathBuf;

use thiserror::Error;

use crate::plan::Step;

/// Errors that can occur while resolving or running a build
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("unknown generator `{0}` (expected one of: vs14, make, eclipse)")]
    InvalidGenerator(String),

    #[error("cmake not found in path: {0}")]
    CMakeNotFound(#[from] which::Error),

    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{step} step failed with {}{}", exit_code_text(.exit_code), stderr_text(.stderr))]
    BuildFailed {
        step: Step,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("failed to read cmake presets from {}: {source}", .path.display())]
    Presets {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("preset `{0}` not found in CMakePresets.json")]
    PresetNotFound(String),
}

pub type Result<T> = std::result::Result<T, LaunchError>;

fn exit_code_text(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

fn stderr_text(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(":\n{trimmed}")
    }
}
