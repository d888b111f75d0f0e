//! In-process duration probe reading the audio properties with lofty

use super::traits::{DurationProbe, ProbeError};
use lofty::prelude::*;
use lofty::probe::Probe;
use std::path::Path;

/// Reads the duration from the file's stream properties
pub struct NativeProbe;

impl NativeProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NativeProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl DurationProbe for NativeProbe {
    fn name(&self) -> &str {
        "lofty"
    }

    fn duration(&self, path: &Path) -> Result<i64, ProbeError> {
        let unreadable = |reason: String| ProbeError::Unreadable {
            path: path.display().to_string(),
            reason,
        };

        let tagged_file = Probe::open(path)
            .map_err(|e| unreadable(e.to_string()))?
            .read()
            .map_err(|e| unreadable(e.to_string()))?;

        let duration = tagged_file.properties().duration();
        if duration.is_zero() {
            return Err(unreadable("no duration in stream properties".to_string()));
        }

        Ok(duration.as_millis() as i64)
    }
}
