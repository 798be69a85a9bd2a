//! Reddit adapter
//!
//! Implementation of the content source over the public listing API.

pub mod client;

pub use client::RedditClientImpl;
