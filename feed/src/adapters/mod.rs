//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod reddit;

pub use reddit::RedditClientImpl;
