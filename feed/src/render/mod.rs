//! Render module
//!
//! Turns feed state into displayable rows and text.

pub mod rows;
pub mod text;

pub use rows::{entry_row, feed_rows, EntryRow, FeedRow};
pub use text::render_feed_text;
