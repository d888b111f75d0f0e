use super::Track;
use crate::validation::ValidityRules;
use chrono::{DateTime, Utc};

/// Ordered track list, as read from the input file
///
/// The order is significant: defaults cascade from earlier tracks to later
/// ones, so the list is never re-sorted.
#[derive(Debug, Clone, Default)]
pub struct TrackList {
    tracks: Vec<Track>,
}

impl TrackList {
    /// Create a new empty list
    pub fn new() -> Self {
        Self { tracks: Vec::new() }
    }

    /// Append a track
    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// All tracks in input order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Mutable access to all tracks
    pub fn tracks_mut(&mut self) -> &mut [Track] {
        &mut self.tracks
    }

    /// Tracks that pass the validity rules
    pub fn valid_tracks<'a>(&'a self, rules: &'a ValidityRules) -> impl Iterator<Item = &'a Track> {
        self.tracks.iter().filter(move |t| t.is_valid(rules))
    }

    /// Total number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Number of valid tracks
    pub fn valid_count(&self, rules: &ValidityRules) -> usize {
        self.valid_tracks(rules).count()
    }

    /// Highest disc number among valid tracks, 0 if none
    pub fn total_discs(&self, rules: &ValidityRules) -> u32 {
        self.valid_tracks(rules)
            .filter(|t| !t.disc_number.is_empty())
            .map(|t| parse_count(&t.disc_number))
            .max()
            .unwrap_or(0)
    }

    /// Highest track number among valid tracks on `disc_number`, 0 if none
    pub fn total_tracks(&self, disc_number: &str, rules: &ValidityRules) -> u32 {
        self.valid_tracks(rules)
            .filter(|t| t.disc_number == disc_number && !t.track.is_empty())
            .map(|t| parse_count(&t.track))
            .max()
            .unwrap_or(0)
    }

    /// Earliest modification time among valid tracks
    pub fn created_date(&self, rules: &ValidityRules) -> Option<DateTime<Utc>> {
        self.valid_tracks(rules)
            .map(|t| t.mod_time)
            .min()
            .map(DateTime::from_timestamp_nanos)
    }

    /// Latest modification time among valid tracks
    pub fn updated_date(&self, rules: &ValidityRules) -> Option<DateTime<Utc>> {
        self.valid_tracks(rules)
            .map(|t| t.mod_time)
            .max()
            .map(DateTime::from_timestamp_nanos)
    }
}

impl From<Vec<Track>> for TrackList {
    fn from(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }
}

// Unparseable numbers count as zero
fn parse_count(value: &str) -> u32 {
    value.trim().parse().unwrap_or(0)
}

/// Render a disc or track number, appending "/total" when enabled
pub fn format_position(number: &str, total: u32, show_total: bool) -> String {
    if show_total && !number.is_empty() && total > 0 {
        format!("{}/{}", number, total)
    } else {
        number.to_string()
    }
}
