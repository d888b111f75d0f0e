//! Track data model
//!
//! This module defines the track record, the explicit field registry that
//! maps column names onto it, and the ordered track list with its
//! aggregate counters.

mod field;
mod library;
mod track;

pub use field::Field;
pub use library::{format_position, TrackList};
pub use track::Track;
