//! Plain-text renderer
//!
//! Renders a feed as numbered text, for non-interactive output.

use chrono::{DateTime, Utc};

use crate::feed::FeedState;
use crate::render::rows::{feed_rows, FeedRow};

/// Render a feed to plain text
pub fn render_feed_text(state: &FeedState, now: DateTime<Utc>) -> String {
    let mut buf = String::new();

    // Header
    buf.push_str(&format!("# {} ({})\n\n", state.topic(), state.sort()));

    let rows = feed_rows(state, now);
    if state.items().is_empty() && !state.loading() && state.error().is_none() {
        buf.push_str("_No posts._\n");
        return buf;
    }

    let mut index = 0;
    for row in rows {
        match row {
            FeedRow::Entry(entry) => {
                index += 1;
                buf.push_str(&format!("{:>3}. {}\n", index, entry.title));
                buf.push_str(&format!("     {}\n", entry.meta));
                buf.push_str(&format!("     {}\n\n", entry.url));
            }
            FeedRow::Error(message) => {
                buf.push_str(&format!("[ERROR] {}\n", message));
            }
            FeedRow::Loading => buf.push_str("Loading...\n"),
            FeedRow::End => buf.push_str("-- end of feed --\n"),
        }
    }

    buf
}
