//! UseCase 層
//!
//! ビジネスフローを実装し、Repository と MessagePusher の trait にのみ依存します。
//! 同じ Room の状態を変更する操作は `RoomLocks` で直列化されます。

pub mod check_room;
pub mod create_room;
pub mod error;
pub mod get_activity_logs;
pub mod join_room;
pub mod leave_room;
pub mod reap_expired_rooms;
pub mod relay_signal;
pub mod room_lock;
pub mod send_message;
pub mod update_status;
pub mod verify_room;

#[cfg(test)]
mod test_support;

pub use check_room::CheckRoomUseCase;
pub use create_room::CreateRoomUseCase;
pub use error::{
    CheckRoomError, CreateRoomError, GetActivityLogsError, JoinRoomError, LeaveRoomError,
    ReapError, SendMessageError, UpdateStatusError, VerifyRoomError,
};
pub use get_activity_logs::GetActivityLogsUseCase;
pub use join_room::{JoinRoomCommand, JoinRoomUseCase};
pub use leave_room::LeaveRoomUseCase;
pub use reap_expired_rooms::ReapExpiredRoomsUseCase;
pub use relay_signal::{DropReason, RelayOutcome, RelaySignalUseCase};
pub use room_lock::RoomLocks;
pub use send_message::{SendMessageCommand, SendMessageUseCase};
pub use update_status::UpdateStatusUseCase;
pub use verify_room::VerifyRoomUseCase;
