//! Domain entities
//!
//! Pure domain models for posts, topics and pagination.

pub mod page;
pub mod post;
pub mod topic;

pub use page::{Page, PageCursor, PageRequest};
pub use post::{Post, PostId};
pub use topic::{SortOrder, Topic};
