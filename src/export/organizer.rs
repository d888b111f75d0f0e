//! File system side of the export: normalizing names, reading file
//! metadata and copying renamed tracks

use crate::model::Track;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Characters that are not allowed in a file name on at least one platform
static INVALID_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[<>"|?*/\\:%]+"#).unwrap());

/// Metadata the preprocess pass needs from a track's file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// Modification time, nanoseconds since the epoch
    pub mod_time: i64,

    /// Size in bytes
    pub size: i64,

    /// Modification year in local time
    pub year: i32,
}

/// Replace runs of invalid characters in the last path component with `_`
pub fn normalize_filename(filename: &str) -> String {
    let path = Path::new(filename);
    let Some(name) = path.file_name() else {
        return filename.to_string();
    };

    let name = name.to_string_lossy();
    let normalized = INVALID_CHARS.replace_all(&name, "_");
    if normalized == name {
        return filename.to_string();
    }

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.join(&*normalized).to_string_lossy().into_owned()
        }
        _ => normalized.into_owned(),
    }
}

/// Rename the track's file on disk when its name contains invalid characters
///
/// A file that was already renamed by an earlier run is picked up under its
/// normalized name.
pub fn normalize_track(track: &mut Track) -> Result<()> {
    if track.filename.is_empty() {
        return Ok(());
    }
    if track.original_filename.is_empty() {
        track.original_filename = track.filename.clone();
    }

    let normalized = normalize_filename(&track.filename);
    if normalized == track.filename {
        return Ok(());
    }

    let from = Path::new(&track.filename);
    let to = Path::new(&normalized);
    if from.exists() {
        log::info!("Renaming {} to {}", track.filename, normalized);
        fs::rename(from, to)
            .with_context(|| format!("Failed to rename {:?} to {:?}", from, to))?;
    } else if to.exists() {
        log::debug!("{} was already renamed to {}", track.filename, normalized);
    } else {
        bail!("Cannot find {:?} or {:?}", from, to);
    }

    track.filename = normalized;
    Ok(())
}

/// Read modification time and size of `path`
pub fn stat(path: &Path) -> Result<FileStat> {
    let metadata =
        fs::metadata(path).with_context(|| format!("Failed to stat {:?}", path))?;
    let modified = metadata
        .modified()
        .with_context(|| format!("Failed to read modification time of {:?}", path))?;

    Ok(FileStat {
        mod_time: to_nanos(modified),
        size: i64::try_from(metadata.len()).unwrap_or(i64::MAX),
        year: DateTime::<Local>::from(modified).year(),
    })
}

/// Set the modification time of `path` to `nanos` since the epoch
pub fn set_mod_time(path: &Path, nanos: i64) -> Result<()> {
    let file = File::options()
        .write(true)
        .open(path)
        .with_context(|| format!("Failed to open {:?}", path))?;
    file.set_modified(from_nanos(nanos))
        .with_context(|| format!("Failed to set modification time of {:?}", path))?;
    Ok(())
}

/// Copy `source` to `dest` and give the copy the source's modification time
///
/// Returns the number of bytes copied.
pub fn copy_preserving_mtime(source: &Path, dest: &Path) -> Result<u64> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
    }

    let modified = fs::metadata(source)
        .and_then(|m| m.modified())
        .with_context(|| format!("Failed to stat {:?}", source))?;

    let bytes = fs::copy(source, dest)
        .with_context(|| format!("Failed to copy {:?} to {:?}", source, dest))?;

    if let Err(e) = set_mod_time(dest, to_nanos(modified)) {
        log::warn!("Cannot set time for {:?}: {:#}", dest, e);
    }

    Ok(bytes)
}

fn to_nanos(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_nanos()).unwrap_or(i64::MAX),
        Err(e) => -i64::try_from(e.duration().as_nanos()).unwrap_or(i64::MAX),
    }
}

fn from_nanos(nanos: i64) -> SystemTime {
    let magnitude = Duration::from_nanos(nanos.unsigned_abs());
    if nanos >= 0 {
        UNIX_EPOCH + magnitude
    } else {
        UNIX_EPOCH - magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_filename() {
        assert_eq!(normalize_filename("a.mp3"), "a.mp3");
        assert_eq!(normalize_filename("What? Why*.mp3"), "What_ Why_.mp3");
        assert_eq!(normalize_filename("dir/a:<b>.mp3"), "dir/a_b_.mp3");
        assert_eq!(normalize_filename("100%.mp3"), "100_.mp3");
        assert_eq!(normalize_filename(""), "");
    }

    #[test]
    fn test_normalize_track_renames_file() {
        let dir = TempDir::new().unwrap();
        let original = dir.path().join("Q&A?.mp3");
        fs::write(&original, b"data").unwrap();

        let mut track = Track {
            filename: original.to_string_lossy().into_owned(),
            ..Track::default()
        };
        normalize_track(&mut track).unwrap();

        let expected = dir.path().join("Q&A_.mp3");
        assert_eq!(track.filename, expected.to_string_lossy());
        assert_eq!(track.original_filename, original.to_string_lossy());
        assert!(expected.exists());
        assert!(!original.exists());

        // Second run finds the renamed file
        let mut again = Track {
            filename: original.to_string_lossy().into_owned(),
            ..Track::default()
        };
        normalize_track(&mut again).unwrap();
        assert_eq!(again.filename, track.filename);
    }

    #[test]
    fn test_normalize_track_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut track = Track {
            filename: dir.path().join("gone?.mp3").to_string_lossy().into_owned(),
            ..Track::default()
        };
        assert!(normalize_track(&mut track).is_err());
    }

    #[test]
    fn test_stat_and_copy_preserve_mtime() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.mp3");
        fs::write(&source, vec![0u8; 2048]).unwrap();

        // 2001-09-09T01:46:40Z
        let nanos = 1_000_000_000_000_000_000;
        set_mod_time(&source, nanos).unwrap();

        let st = stat(&source).unwrap();
        assert_eq!(st.size, 2048);
        assert_eq!(st.mod_time, nanos);
        assert_eq!(st.year, 2001);

        let dest = dir.path().join("out").join("b.mp3");
        assert_eq!(copy_preserving_mtime(&source, &dest).unwrap(), 2048);
        assert_eq!(stat(&dest).unwrap().mod_time, nanos);
    }

    #[test]
    fn test_stat_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(stat(&dir.path().join("missing.mp3")).is_err());
    }
}
