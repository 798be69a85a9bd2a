//! Application layer
//!
//! Connects the feed state to a content source and drives it from
//! lifecycle and scroll callbacks.

pub mod stream_view;

pub use stream_view::{StreamSettings, StreamView};
