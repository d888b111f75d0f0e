//! Duration probe trait definitions

use std::path::Path;
use thiserror::Error;

/// Measures the playing time of an audio file
pub trait DurationProbe {
    /// Short name used in log messages
    fn name(&self) -> &str;

    /// Duration of `path` in milliseconds
    fn duration(&self, path: &Path) -> Result<i64, ProbeError>;
}

/// Why a probe could not produce a duration
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0} is not set")]
    NotConfigured(&'static str),

    #[error("Command failed: {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed: {command}: {status}: {stderr}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Command failed: {command}: duration not found in {output:?}")]
    Unparseable { command: String, output: String },

    #[error("Cannot read {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("All duration probes failed: {0}")]
    Exhausted(String),
}
