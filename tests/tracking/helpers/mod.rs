//! Shared fixtures for the tracking integration tests
//!
//! Synthetic scenes with a solid block on a textured background, and a
//! scripted detector that replays a fixed sequence of outcomes.

pub mod scenes;
pub mod scripted;
