//! Cover artwork for tags and the feed
//!
//! The front cover embedded in every MP3 is read once from the configured
//! image file. The channel image is only inspected: podcast directories
//! reject images outside 1400..=3000 pixels on either side.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Smallest accepted channel image side, in pixels
pub const IMAGE_SIZE_MIN: u32 = 1400;

/// Largest accepted channel image side, in pixels
pub const IMAGE_SIZE_MAX: u32 = 3000;

/// MIME type used when the image extension is not recognized
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Problems with the channel image; none of them stop the export
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("image {path}'s {side} ({actual}) needs to be {limit} or {bound}")]
    OutOfRange {
        path: String,
        side: &'static str,
        actual: u32,
        limit: u32,
        bound: &'static str,
    },
}

/// Picture data for an APIC frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontCover {
    /// MIME type derived from the file extension
    pub mime_type: String,

    /// Raw image bytes
    pub data: Vec<u8>,
}

impl FrontCover {
    /// Load the cover at `path`
    ///
    /// A missing file is not an error, the tracks are simply tagged without
    /// a picture. A file that exists but cannot be read is.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            log::debug!("No front cover at {}", path.display());
            return Ok(None);
        }

        let data = fs::read(path)
            .with_context(|| format!("Failed to read front cover: {}", path.display()))?;

        let mime_type = match mime_type_for(path) {
            Some(mime) => mime,
            None => {
                log::warn!("Unknown image format {}, assuming {}", path.display(), DEFAULT_MIME_TYPE);
                DEFAULT_MIME_TYPE
            }
        };

        log::debug!("Loaded front cover {} ({} bytes, {})", path.display(), data.len(), mime_type);
        Ok(Some(Self {
            mime_type: mime_type.to_string(),
            data,
        }))
    }
}

/// MIME type for an image file extension
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

/// Check that the channel image at `path` has acceptable dimensions
///
/// Returns the image's width and height when they are in range.
pub fn check_channel_image(path: &Path) -> Result<(u32, u32), ImageError> {
    let name = path.display().to_string();
    let (width, height) = image::image_dimensions(path).map_err(|source| ImageError::Unreadable {
        path: name.clone(),
        source,
    })?;

    for (side, actual) in [("width", width), ("height", height)] {
        if actual < IMAGE_SIZE_MIN {
            return Err(ImageError::OutOfRange {
                path: name,
                side,
                actual,
                limit: IMAGE_SIZE_MIN,
                bound: "greater",
            });
        }
        if actual > IMAGE_SIZE_MAX {
            return Err(ImageError::OutOfRange {
                path: name,
                side,
                actual,
                limit: IMAGE_SIZE_MAX,
                bound: "less",
            });
        }
    }

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for(Path::new("cover.JPG")), Some("image/jpeg"));
        assert_eq!(mime_type_for(Path::new("cover.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_type_for(Path::new("cover.png")), Some("image/png"));
        assert_eq!(mime_type_for(Path::new("cover.gif")), None);
        assert_eq!(mime_type_for(Path::new("cover")), None);
    }

    #[test]
    fn test_missing_cover_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(FrontCover::load(&dir.path().join("default.jpg")).unwrap().is_none());
    }

    #[test]
    fn test_load_cover() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cover.png");
        fs::write(&path, b"not really a png").unwrap();

        let cover = FrontCover::load(&path).unwrap().unwrap();
        assert_eq!(cover.mime_type, "image/png");
        assert_eq!(cover.data, b"not really a png");
    }

    #[test]
    fn test_small_channel_image_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("small.png");
        image::RgbImage::new(100, 1500).save(&path).unwrap();

        match check_channel_image(&path) {
            Err(ImageError::OutOfRange { side, actual, .. }) => {
                assert_eq!(side, "width");
                assert_eq!(actual, 100);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_channel_image_in_range() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ok.png");
        image::RgbImage::new(1400, 1400).save(&path).unwrap();

        assert_eq!(check_channel_image(&path).unwrap(), (1400, 1400));
    }

    #[test]
    fn test_unreadable_channel_image() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            check_channel_image(&dir.path().join("missing.jpg")),
            Err(ImageError::Unreadable { .. })
        ));
    }
}
