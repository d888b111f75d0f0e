use super::Field;
use std::path::Path;

/// A single row of the track list plus the state derived from its file
///
/// Every user-settable field is a string, and an empty string means "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    /// Path to the audio file, as given in the track list
    pub filename: String,

    /// Album artist (TPE2)
    pub album_artist: String,

    /// Album title
    pub album_title: String,

    /// Track artist
    pub artist: String,

    /// Composer
    pub composer: String,

    /// Copyright message
    pub copyright: String,

    /// Feed item description
    pub description: String,

    /// Disc number within the set
    pub disc_number: String,

    /// Genre
    pub genre: String,

    /// Track number on the disc
    pub track: String,

    /// Feed item subtitle
    pub subtitle: String,

    /// Feed item summary
    pub summary: String,

    /// Track title
    pub title: String,

    /// Release year
    pub year: String,

    /// Filename before normalization
    pub original_filename: String,

    /// Duration in milliseconds, 0 when unknown
    pub duration_ms: i64,

    /// File size in bytes
    pub file_size: i64,

    /// File size before any copy
    pub original_file_size: i64,

    /// Modification time in nanoseconds since the epoch
    pub mod_time: i64,

    /// Modification time as first seen
    pub original_mod_time: i64,

    /// Whether the preprocess pass has stat'ed and resolved this track
    pub processed: bool,
}

impl Track {
    /// Create an empty track
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a user-settable field
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Filename => &self.filename,
            Field::AlbumArtist => &self.album_artist,
            Field::AlbumTitle => &self.album_title,
            Field::Artist => &self.artist,
            Field::Composer => &self.composer,
            Field::Copyright => &self.copyright,
            Field::Description => &self.description,
            Field::DiscNumber => &self.disc_number,
            Field::Genre => &self.genre,
            Field::TrackNo => &self.track,
            Field::Subtitle => &self.subtitle,
            Field::Summary => &self.summary,
            Field::Title => &self.title,
            Field::Year => &self.year,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Filename => &mut self.filename,
            Field::AlbumArtist => &mut self.album_artist,
            Field::AlbumTitle => &mut self.album_title,
            Field::Artist => &mut self.artist,
            Field::Composer => &mut self.composer,
            Field::Copyright => &mut self.copyright,
            Field::Description => &mut self.description,
            Field::DiscNumber => &mut self.disc_number,
            Field::Genre => &mut self.genre,
            Field::TrackNo => &mut self.track,
            Field::Subtitle => &mut self.subtitle,
            Field::Summary => &mut self.summary,
            Field::Title => &mut self.title,
            Field::Year => &mut self.year,
        }
    }

    /// Set a field, trimming surrounding whitespace
    pub fn set_field(&mut self, field: Field, value: &str) {
        *self.slot_mut(field) = value.trim().to_string();
    }

    /// Set a field by column name. Returns false if the name is unknown.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        match Field::from_name(name) {
            Some(field) => {
                self.set_field(field, value);
                true
            }
            None => false,
        }
    }

    /// Name → value map used by the rename mask, including aliases
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        Field::ALL
            .into_iter()
            .flat_map(|field| field.names().map(move |name| (name, self.get(field))))
            .collect()
    }

    /// True when every field except filename and title is empty
    pub fn has_only_title(&self) -> bool {
        [
            &self.artist,
            &self.description,
            &self.track,
            &self.disc_number,
            &self.album_title,
            &self.genre,
            &self.album_artist,
            &self.summary,
            &self.copyright,
            &self.composer,
            &self.year,
        ]
        .iter()
        .all(|value| value.is_empty())
    }

    /// Filename without directory and extension
    pub fn base_title(&self) -> String {
        Path::new(&self.filename)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Duration as HH:MM:SS, rounding partial seconds up
    pub fn duration_hms(&self) -> String {
        let mut remaining = self.duration_ms.max(0);
        let millis = remaining % 1000;
        remaining /= 1000;
        let mut seconds = remaining % 60;
        remaining /= 60;
        let mut minutes = remaining % 60;
        let mut hours = remaining / 60;

        if millis > 0 {
            seconds += 1;
        }
        if seconds > 59 {
            minutes += 1;
            seconds = 0;
        }
        if minutes > 59 {
            hours += 1;
            minutes = 0;
        }

        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut track = Track::new();
        assert!(track.set("Title", "  My Song "));
        assert!(track.set("track", "3"));
        assert!(!track.set("bpm", "128"));

        assert_eq!(track.get(Field::Title), "My Song");
        assert_eq!(track.track, "3");
    }

    #[test]
    fn test_fields_include_aliases() {
        let mut track = Track::new();
        track.track = "7".to_string();

        let fields = track.fields();
        assert!(fields.contains(&("track_no", "7")));
        assert!(fields.contains(&("track", "7")));
        assert_eq!(fields.len(), 15);
    }

    #[test]
    fn test_has_only_title() {
        let mut track = Track::new();
        track.filename = "a.mp3".to_string();
        track.title = "skip".to_string();
        assert!(track.has_only_title());

        track.artist = "Someone".to_string();
        assert!(!track.has_only_title());
    }

    #[test]
    fn test_base_title() {
        let mut track = Track::new();
        track.filename = "audio/01 Intro.mp3".to_string();
        assert_eq!(track.base_title(), "01 Intro");
    }

    #[test]
    fn test_duration_hms() {
        let mut track = Track::new();
        track.duration_ms = 0;
        assert_eq!(track.duration_hms(), "00:00:00");

        track.duration_ms = 61_000;
        assert_eq!(track.duration_hms(), "00:01:01");

        // Partial seconds round up and carry
        track.duration_ms = 3_599_001;
        assert_eq!(track.duration_hms(), "01:00:00");
    }
}
