//! Shared types used across the mazeworld crates.

pub mod types;

pub use types::{EntityId, GridPos, Transform};
