//! Track validation
//!
//! Decides whether a track is exported or skipped.

mod classify;

pub use classify::{TrackError, ValidityRules, MIN_DURATION_MS, MIN_FILE_SIZE, SKIP_WORDS};
