//! Feed entries built from tracks

use crate::model::Track;
use chrono::{DateTime, Utc};
use std::path::{Component, Path};

/// MIME type of every enclosure
pub const ENCLOSURE_TYPE: &str = "audio/mpeg";

/// One `<item>` of the feed
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    pub subtitle: String,
    pub summary: String,
    pub author: String,

    /// Publication date, the file's modification time
    pub pub_date: DateTime<Utc>,

    /// `HH:MM:SS`, omitted when the duration is unknown
    pub duration: Option<String>,

    pub image_url: String,

    /// Download URL, also used as the item's guid
    pub enclosure_url: String,

    /// Enclosure length in bytes
    pub length: i64,
}

impl FeedItem {
    /// Build the entry for a processed track
    pub fn new(track: &Track, base_url: &str, image_url: &str) -> Self {
        Self {
            title: track.title.clone(),
            description: track.description.clone(),
            subtitle: track.subtitle.clone(),
            summary: track.summary.clone(),
            author: track.artist.clone(),
            pub_date: DateTime::from_timestamp_nanos(track.mod_time),
            duration: (track.duration_ms > 0).then(|| track.duration_hms()),
            image_url: image_url.to_string(),
            enclosure_url: enclosure_url(base_url, &track.filename),
            length: track.file_size,
        }
    }
}

/// Public URL of `filename` under `base_url`
///
/// Relative paths keep their directories, absolute ones are reduced to the
/// file name. Each path segment is percent-encoded.
pub fn enclosure_url(base_url: &str, filename: &str) -> String {
    let path = Path::new(filename);
    let segments: Vec<String> = if path.is_absolute() {
        path.file_name()
            .map(|name| vec![urlencoding::encode(&name.to_string_lossy()).into_owned()])
            .unwrap_or_default()
    } else {
        path.components()
            .filter_map(|component| match component {
                Component::Normal(segment) => Some(segment.to_string_lossy()),
                _ => None,
            })
            .map(|segment| urlencoding::encode(&segment).into_owned())
            .collect()
    };

    format!("{}{}", base_url, segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enclosure_url() {
        let base = "https://example.com/pod/";
        assert_eq!(enclosure_url(base, "ep1.mp3"), "https://example.com/pod/ep1.mp3");
        assert_eq!(
            enclosure_url(base, "season 1/My Song.mp3"),
            "https://example.com/pod/season%201/My%20Song.mp3"
        );
        assert_eq!(
            enclosure_url(base, "./a&b.mp3"),
            "https://example.com/pod/a%26b.mp3"
        );
        assert_eq!(enclosure_url(base, "/srv/audio/ep1.mp3"), "https://example.com/pod/ep1.mp3");
    }

    #[test]
    fn test_item_from_track() {
        let track = Track {
            filename: "ep1.mp3".to_string(),
            title: "Episode 1".to_string(),
            description: "Episode 1".to_string(),
            artist: "Jane".to_string(),
            duration_ms: 61_500,
            file_size: 4096,
            mod_time: 1_000_000_000_000_000_000,
            ..Track::default()
        };

        let item = FeedItem::new(&track, "https://example.com/", "https://example.com/default.jpg");
        assert_eq!(item.enclosure_url, "https://example.com/ep1.mp3");
        assert_eq!(item.duration.as_deref(), Some("00:01:02"));
        assert_eq!(item.length, 4096);
        assert_eq!(item.pub_date.timestamp(), 1_000_000_000);
        assert_eq!(item.author, "Jane");
    }

    #[test]
    fn test_unknown_duration_is_omitted() {
        let track = Track {
            filename: "ep1.mp3".to_string(),
            title: "Episode 1".to_string(),
            ..Track::default()
        };
        assert_eq!(FeedItem::new(&track, "", "").duration, None);
    }
}
