//! Feedster - podcast feeds from a track list
//!
//! Reads a CSV or spreadsheet track list, fills in missing metadata from
//! earlier tracks and configured defaults, writes ID3 tags into the MP3
//! files and emits an RSS feed referencing them.

pub mod artwork;
pub mod export;
pub mod feed;
pub mod input;
pub mod model;
pub mod probe;
pub mod rename;
pub mod resolve;
pub mod tags;
pub mod validation;

pub use export::config::{Defaults, ExportConfig};
pub use export::pipeline::{ExportPipeline, ExportSummary};
pub use model::{Track, TrackList};
