//! Domain layer
//!
//! Contains pure domain logic with no external dependencies.
//! - `entities`: Posts, topics and pagination types
//! - `ports`: Trait definitions for external dependencies

pub mod entities;
pub mod ports;
