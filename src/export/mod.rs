//! Export orchestration: configuration, file handling and the two-pass
//! pipeline

pub mod config;
pub mod organizer;
pub mod pipeline;

pub use config::{Defaults, ExportConfig};
pub use pipeline::{ExportPipeline, ExportSummary};
