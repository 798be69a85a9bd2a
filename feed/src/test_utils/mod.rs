//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//! Mocks are hand-written rather than generated so tests control exactly
//! what each fetch returns and when it completes.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
