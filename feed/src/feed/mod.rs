//! Feed module
//!
//! Feed state, its pure update functions and scroll geometry.

pub mod dedup;
pub mod state;
pub mod viewport;

pub use dedup::dedup_by_id;
pub use state::{ApplyOutcome, FeedState, LoadTicket};
pub use viewport::Viewport;
