//! Repository 実装
//!
//! - `inmemory`: HashMap をインメモリ DB として使う実装
//! - 将来的に: `postgres`, `redis` など

pub mod inmemory;

pub use inmemory::{
    DEFAULT_ACTIVITY_LOG_CAPACITY, InMemoryActivityLogRepository, InMemoryRoomRepository,
};
