//! Media duration probing
//!
//! Durations come from external tools or from reading the stream
//! properties in-process. All strategies sit behind one trait so the
//! resolver can be driven by a stub in tests and by `--no-probe` runs.

mod chain;
mod command;
mod native;
mod stub;
mod traits;

pub use chain::ProbeChain;
pub use command::{parse_exiftool, parse_ffmpeg, parse_ffprobe, CommandProbe, Tool};
pub use native::NativeProbe;
pub use stub::StubProbe;
pub use traits::{DurationProbe, ProbeError};
