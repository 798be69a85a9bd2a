//! redstream feed
//!
//! An infinitely scrolling, deduplicated feed of posts from a paginated
//! content API. Uses hexagonal (ports & adapters) architecture:
//! - `domain`: posts, topics, pagination and the `ContentSource` port
//! - `adapters`: the Reddit listing API client
//! - `feed`: feed state and its pure update functions
//! - `app`: the stream view driving the state from UI callbacks
//! - `render`: rows and text for display

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod render;

#[cfg(test)]
mod test_utils;


pub use adapters::RedditClientImpl;
pub use app::{StreamSettings, StreamView};
pub use config::Config;
pub use domain::entities::{Page, PageCursor, PageRequest, Post, PostId, SortOrder, Topic};
pub use domain::ports::ContentSource;
pub use error::{ConfigError, DomainError, FetchError};
pub use feed::{ApplyOutcome, FeedState, Viewport};
pub use render::{render_feed_text, EntryRow, FeedRow};
