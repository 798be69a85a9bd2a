//! Feed rows
//!
//! View model of a rendered feed: one entry per post, followed by the
//! status rows (error, loading indicator, end marker).

use chrono::{DateTime, Utc};

use crate::domain::entities::Post;
use crate::feed::FeedState;

/// A post as shown in the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub id: String,
    pub title: String,
    /// Score, community, author, comment count and age
    pub meta: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedRow {
    Entry(EntryRow),
    Error(String),
    Loading,
    End,
}

/// Map the feed state to rows, in display order
pub fn feed_rows(state: &FeedState, now: DateTime<Utc>) -> Vec<FeedRow> {
    let mut rows: Vec<FeedRow> = state
        .items()
        .iter()
        .map(|post| FeedRow::Entry(entry_row(post, now)))
        .collect();

    if let Some(message) = state.error() {
        rows.push(FeedRow::Error(message.to_string()));
    }

    if state.loading() {
        rows.push(FeedRow::Loading);
    } else if state.exhausted() {
        rows.push(FeedRow::End);
    }

    rows
}

pub fn entry_row(post: &Post, now: DateTime<Utc>) -> EntryRow {
    let title = if post.over_18 {
        format!("[nsfw] {}", post.title)
    } else {
        post.title.clone()
    };

    let comments = if post.num_comments == 1 {
        "1 comment".to_string()
    } else {
        format!("{} comments", post.num_comments)
    };

    EntryRow {
        id: post.id.0.clone(),
        title,
        meta: format!(
            "{} points · r/{} · u/{} · {} · {}",
            post.score,
            post.subreddit,
            post.author,
            comments,
            post.age(now)
        ),
        url: post.url.clone(),
    }
}
