//! Domain ports (traits)
//!
//! Port traits define interfaces that the feed requires.
//! Adapters provide concrete implementations of these traits.

pub mod content_source;

pub use content_source::ContentSource;
