//! Podcast feed generation
//!
//! Channel settings come from the settings file layered over the configured
//! defaults; one item is written per exported track.

mod channel;
mod item;
mod writer;

pub use channel::{Channel, ChannelSettings};
pub use item::{enclosure_url, FeedItem, ENCLOSURE_TYPE};
pub use writer::Feed;
