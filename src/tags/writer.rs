//! ID3v2.3 tag writer

use crate::artwork::FrontCover;
use crate::export::organizer::set_mod_time;
use crate::model::Track;
use anyhow::{Context, Result};
use id3::frame::{Comment, Picture, PictureType};
use id3::{ErrorKind, Tag, TagLike, Version};
use std::path::Path;

/// Description of the COMM frame holding the copyright line
pub const COPYRIGHT_DESCRIPTION: &str = "Copyright";

/// Values shared by every tag written during one export
#[derive(Debug, Clone, Default)]
pub struct TagSettings {
    /// ISO 639-2 code for the COMM frame
    pub language_code: String,

    /// Language tag as configured, written to TLAN
    pub language: String,

    /// TENC, omitted when empty
    pub encoded_by: String,

    /// APIC front cover
    pub cover: Option<FrontCover>,
}

/// Writes tags into the MP3 files of resolved tracks
pub struct TagWriter {
    settings: TagSettings,
}

impl TagWriter {
    pub fn new(settings: TagSettings) -> Self {
        Self { settings }
    }

    /// Tag `track`'s file with `disc` and `position` as TPOS and TRCK
    ///
    /// The existing tag is kept and updated. The file's modification time is
    /// put back afterwards so the feed's dates do not change.
    pub fn write(&self, track: &Track, disc: &str, position: &str) -> Result<()> {
        let path = Path::new(&track.filename);
        let tag = match Tag::read_from_path(path) {
            Ok(tag) => tag,
            Err(id3::Error {
                kind: ErrorKind::NoTag,
                ..
            }) => Tag::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read tags from {:?}", path))
            }
        };

        let tag = self.apply(tag, track, disc, position);
        tag.write_to_path(path, Version::Id3v23)
            .with_context(|| format!("Failed to write tags to {:?}", path))?;
        log::debug!("Wrote tags to {}", track.filename);

        if track.mod_time != 0 {
            set_mod_time(path, track.mod_time)?;
        }
        Ok(())
    }

    /// Set every frame derived from `track` on `tag`
    pub fn apply(&self, mut tag: Tag, track: &Track, disc: &str, position: &str) -> Tag {
        log::debug!("{}: disc {} track {}", track.filename, disc, position);

        set(&mut tag, "TPE2", &track.album_artist);
        set(&mut tag, "TALB", &track.album_title);
        set(&mut tag, "TPOS", disc);
        set(&mut tag, "TPE1", &track.artist);
        set(&mut tag, "TCOP", &track.copyright);
        set(&mut tag, "TCON", &track.genre);
        set(&mut tag, "TRCK", position);
        set(&mut tag, "TIT2", &track.title);
        set(&mut tag, "TYER", &track.year);

        if !track.copyright.is_empty() {
            tag.add_frame(Comment {
                lang: self.settings.language_code.clone(),
                description: COPYRIGHT_DESCRIPTION.to_string(),
                text: track.copyright.clone(),
            });
        }

        let composer = if track.composer.is_empty() {
            &track.artist
        } else {
            &track.composer
        };
        set(&mut tag, "TCOM", composer);
        set(&mut tag, "TENC", &self.settings.encoded_by);
        set(&mut tag, "TLAN", &self.settings.language);
        set(&mut tag, "TOFN", &track.original_filename);

        if let Some(cover) = &self.settings.cover {
            tag.remove_picture_by_type(PictureType::CoverFront);
            tag.add_frame(Picture {
                mime_type: cover.mime_type.clone(),
                picture_type: PictureType::CoverFront,
                description: "Front cover".to_string(),
                data: cover.data.clone(),
            });
        }

        tag
    }
}

fn set(tag: &mut Tag, id: &str, value: &str) {
    if !value.is_empty() {
        tag.set_text(id, value);
    }
}
