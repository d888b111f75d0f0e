//! Stub probe for runs without duration measurement

use super::traits::{DurationProbe, ProbeError};
use std::path::Path;

/// Probe that returns a fixed duration, or always fails
pub struct StubProbe {
    duration_ms: Option<i64>,
}

impl StubProbe {
    /// Every file reports `duration_ms`
    pub fn fixed(duration_ms: i64) -> Self {
        Self {
            duration_ms: Some(duration_ms),
        }
    }

    /// Every probe fails, leaving durations unknown
    pub fn unavailable() -> Self {
        Self { duration_ms: None }
    }
}

impl DurationProbe for StubProbe {
    fn name(&self) -> &str {
        "stub"
    }

    fn duration(&self, _path: &Path) -> Result<i64, ProbeError> {
        self.duration_ms
            .ok_or(ProbeError::NotConfigured("duration probing"))
    }
}
