//! Data Transfer Objects (DTOs) for the focus room service.
//!
//! DTOs are organized by protocol:
//! - `websocket`: realtime channel event DTOs
//! - `http`: HTTP API request / response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
