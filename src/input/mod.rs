//! Track list readers
//!
//! The first row of a track list is a header naming the track fields. Column
//! names are matched case-insensitively; unknown columns are ignored.

mod csv;
mod xlsx;

use crate::model::{Field, Track};
use anyhow::{bail, Result};
use std::path::Path;

pub use self::csv::read_csv;
pub use self::xlsx::read_xlsx;

/// Read tracks from `path`, choosing the reader by file extension
pub fn read_tracks(path: &Path) -> Result<Vec<Track>> {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    log::info!("Reading {}", path.display());
    let tracks = match ext.as_str() {
        "csv" => read_csv(path)?,
        "xls" | "xlsx" => read_xlsx(path)?,
        _ => bail!("Unknown file format: {:?}", ext),
    };

    log::info!("Read {} tracks from {}", tracks.len(), path.display());
    Ok(tracks)
}

/// Column index to field mapping built from a header row
#[derive(Debug, Clone, Default)]
pub(crate) struct Columns(Vec<Option<Field>>);

impl Columns {
    pub(crate) fn new<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self(
            headers
                .into_iter()
                .map(|header| {
                    let field = Field::from_name(header);
                    if field.is_none() && !header.trim().is_empty() {
                        log::debug!("Ignoring column {:?}", header);
                    }
                    field
                })
                .collect(),
        )
    }

    /// Build a track from one data row
    pub(crate) fn track<'a, I>(&self, cells: I) -> Track
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut track = Track::new();
        for (field, value) in self.0.iter().zip(cells) {
            if let Some(field) = field {
                track.set_field(*field, value);
            }
        }
        track
    }
}
