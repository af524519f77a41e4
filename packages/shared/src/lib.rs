//! Shared utilities for the Focus Room workspace.
//!
//! - `time`: clock abstraction and timestamp formatting
//! - `logger`: tracing subscriber setup

pub mod logger;
pub mod time;
