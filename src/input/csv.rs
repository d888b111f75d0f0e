//! CSV track lists

use super::Columns;
use crate::model::Track;
use anyhow::{Context, Result};
use std::path::Path;

/// Read every data row of the CSV file at `path`
pub fn read_csv(path: &Path) -> Result<Vec<Track>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open track list: {:?}", path))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {:?}", path))?
        .clone();
    let columns = Columns::new(headers.iter());

    let mut tracks = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read row {} of {:?}", i + 2, path))?;
        tracks.push(columns.track(record.iter()));
    }

    Ok(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracks.csv");
        fs::write(
            &path,
            "filename,title,artist,track_no,unused\n\
             a.mp3,First,\"Doe, Jane\",1,x\n\
             b.mp3,Second\n\
             ,skip\n",
        )
        .unwrap();

        let tracks = read_csv(&path).unwrap();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0].artist, "Doe, Jane");
        assert_eq!(tracks[0].track, "1");
        assert_eq!(tracks[1].title, "Second");
        assert!(tracks[1].artist.is_empty());
        assert!(tracks[2].filename.is_empty());
        assert_eq!(tracks[2].title, "skip");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(read_csv(&dir.path().join("missing.csv")).is_err());
    }
}
