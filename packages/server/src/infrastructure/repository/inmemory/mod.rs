//! InMemory Repository 実装

pub mod activity;
pub mod room;

pub use activity::{DEFAULT_ACTIVITY_LOG_CAPACITY, InMemoryActivityLogRepository};
pub use room::InMemoryRoomRepository;
