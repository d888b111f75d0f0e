//! Track validity classification

use crate::model::Track;
use thiserror::Error;

/// Default minimum duration for a track to be exported
pub const MIN_DURATION_MS: i64 = 1000;

/// Default minimum file size for a track to be exported
pub const MIN_FILE_SIZE: i64 = 1024;

/// Default titles that mark a row as a placeholder to skip
pub const SKIP_WORDS: &[&str] = &[
    "avoid",
    "bypass",
    "circumvent",
    "dodge",
    "duck",
    "forget",
    "hide",
    "ignore",
    "neglect",
    "no",
    "omit",
    "overlook",
    "pass",
    "quit",
    "reject",
    "sidestep",
    "shirk",
    "skirt",
    "skip",
    "x",
];

/// Why a track is not exported
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    #[error("Filename is empty")]
    EmptyFilename,

    #[error("File is marked to be skipped")]
    MarkedForSkip,

    #[error("File does not exist, or is unreadable")]
    FileUnreadable,

    #[error("File is only {duration_ms} milliseconds in duration, >={min} required")]
    TooShort { duration_ms: i64, min: i64 },

    #[error("File is only {size} bytes, >={min} is required")]
    TooSmall { size: i64, min: i64 },
}

/// Thresholds and sentinel words used to classify tracks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidityRules {
    pub min_duration_ms: i64,
    pub min_file_size: i64,
    pub skip_words: Vec<String>,
}

impl Default for ValidityRules {
    fn default() -> Self {
        Self {
            min_duration_ms: MIN_DURATION_MS,
            min_file_size: MIN_FILE_SIZE,
            skip_words: SKIP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl ValidityRules {
    fn is_skip_word(&self, title: &str) -> bool {
        self.skip_words.iter().any(|w| w == title)
    }
}

impl Track {
    /// Reason this track should not be exported, if any
    ///
    /// Checks run in order and stop at the first failure. Tracks that the
    /// preprocess pass has not reached yet only get the filename and skip
    /// checks.
    pub fn error(&self, rules: &ValidityRules) -> Option<TrackError> {
        if self.filename.is_empty() {
            return Some(TrackError::EmptyFilename);
        }
        // A sentinel title only means "skip" on an otherwise empty row
        if rules.is_skip_word(&self.title) && self.has_only_title() {
            return Some(TrackError::MarkedForSkip);
        }
        if !self.processed {
            return None;
        }
        if self.mod_time == 0 {
            return Some(TrackError::FileUnreadable);
        }
        // Zero means the duration is unknown, not too short
        if self.duration_ms > 0 && self.duration_ms < rules.min_duration_ms {
            return Some(TrackError::TooShort {
                duration_ms: self.duration_ms,
                min: rules.min_duration_ms,
            });
        }
        if self.file_size < rules.min_file_size {
            return Some(TrackError::TooSmall {
                size: self.file_size,
                min: rules.min_file_size,
            });
        }
        None
    }

    /// Whether this track should be exported
    pub fn is_valid(&self, rules: &ValidityRules) -> bool {
        self.error(rules).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed_track() -> Track {
        Track {
            filename: "episode.mp3".to_string(),
            title: "Episode".to_string(),
            mod_time: 1_700_000_000_000_000_000,
            file_size: 2048,
            processed: true,
            ..Track::default()
        }
    }

    #[test]
    fn test_empty_filename() {
        let track = Track {
            title: "Something".to_string(),
            ..Track::default()
        };
        assert_eq!(
            track.error(&ValidityRules::default()),
            Some(TrackError::EmptyFilename)
        );
    }

    #[test]
    fn test_skip_sentinel_requires_empty_row() {
        let rules = ValidityRules::default();
        let mut track = Track {
            filename: "a.mp3".to_string(),
            title: "skip".to_string(),
            ..Track::default()
        };
        assert_eq!(track.error(&rules), Some(TrackError::MarkedForSkip));

        track.artist = "Someone".to_string();
        assert_eq!(track.error(&rules), None);
    }

    #[test]
    fn test_skip_sentinel_is_exact() {
        let rules = ValidityRules::default();
        let track = Track {
            filename: "a.mp3".to_string(),
            title: "Skip".to_string(),
            ..Track::default()
        };
        assert_eq!(track.error(&rules), None);

        let track = Track {
            filename: "a.mp3".to_string(),
            title: "skipping".to_string(),
            ..Track::default()
        };
        assert_eq!(track.error(&rules), None);
    }

    #[test]
    fn test_unprocessed_is_provisionally_valid() {
        let track = Track {
            filename: "a.mp3".to_string(),
            title: "Episode".to_string(),
            ..Track::default()
        };
        assert!(track.is_valid(&ValidityRules::default()));
    }

    #[test]
    fn test_unreadable() {
        let mut track = processed_track();
        track.mod_time = 0;
        assert_eq!(
            track.error(&ValidityRules::default()),
            Some(TrackError::FileUnreadable)
        );
    }

    #[test]
    fn test_minimum_duration_boundary() {
        let rules = ValidityRules::default();
        let mut track = processed_track();

        track.duration_ms = 0;
        assert!(track.is_valid(&rules));

        track.duration_ms = 500;
        assert_eq!(
            track.error(&rules),
            Some(TrackError::TooShort {
                duration_ms: 500,
                min: 1000
            })
        );

        track.duration_ms = 1000;
        assert!(track.is_valid(&rules));
    }

    #[test]
    fn test_too_small() {
        let mut track = processed_track();
        track.file_size = 1023;
        let err = track.error(&ValidityRules::default()).unwrap();
        assert_eq!(err, TrackError::TooSmall { size: 1023, min: 1024 });
        assert_eq!(err.to_string(), "File is only 1023 bytes, >=1024 is required");
    }
}
