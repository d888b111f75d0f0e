//! Ordered fallback across several probes

use super::command::CommandProbe;
use super::native::NativeProbe;
use super::traits::{DurationProbe, ProbeError};
use crate::export::config::Defaults;
use std::path::Path;

/// Tries each probe in turn; the first success wins
pub struct ProbeChain {
    probes: Vec<Box<dyn DurationProbe>>,
}

impl ProbeChain {
    pub fn new() -> Self {
        Self { probes: Vec::new() }
    }

    /// Append a probe to the end of the chain
    pub fn with(mut self, probe: impl DurationProbe + 'static) -> Self {
        self.probes.push(Box::new(probe));
        self
    }

    /// ffprobe, ffmpeg and exiftool as configured (empty commands are
    /// skipped), then lofty
    pub fn from_defaults(defaults: &Defaults) -> Self {
        let mut chain = Self::new();
        if !defaults.ffprobe.is_empty() {
            chain = chain.with(CommandProbe::ffprobe(defaults.ffprobe.clone()));
        }
        if !defaults.ffmpeg.is_empty() {
            chain = chain.with(CommandProbe::ffmpeg(defaults.ffmpeg.clone()));
        }
        if !defaults.exiftool.is_empty() {
            chain = chain.with(CommandProbe::exiftool(defaults.exiftool.clone()));
        }
        chain.with(NativeProbe::new())
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

impl Default for ProbeChain {
    fn default() -> Self {
        Self::new()
    }
}

impl DurationProbe for ProbeChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn duration(&self, path: &Path) -> Result<i64, ProbeError> {
        let mut failures = Vec::new();

        for probe in &self.probes {
            match probe.duration(path) {
                Ok(ms) => {
                    log::debug!("{}: {:?} is {} ms", probe.name(), path, ms);
                    return Ok(ms);
                }
                Err(e) => {
                    log::debug!("{} failed for {:?}: {}", probe.name(), path, e);
                    failures.push(format!("{}: {}", probe.name(), e));
                }
            }
        }

        Err(ProbeError::Exhausted(failures.join("; ")))
    }
}
