//! ID3 tagging of exported tracks

mod writer;

pub use writer::{TagSettings, TagWriter, COPYRIGHT_DESCRIPTION};
