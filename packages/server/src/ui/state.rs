//! Shared application state.

use std::sync::Arc;

use focusroom_shared::time::Clock;

use crate::{
    domain::{ActivityLogRepository, MessagePusher, RoomRepository},
    usecase::{
        CheckRoomUseCase, CreateRoomUseCase, GetActivityLogsUseCase, JoinRoomUseCase,
        LeaveRoomUseCase, ReapExpiredRoomsUseCase, RelaySignalUseCase, RoomLocks,
        SendMessageUseCase, UpdateStatusUseCase, VerifyRoomUseCase,
    },
};

/// Shared application state
///
/// Every use case that mutates a room shares the same `RoomLocks`.
pub struct AppState {
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub verify_room_usecase: Arc<VerifyRoomUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub update_status_usecase: Arc<UpdateStatusUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub relay_signal_usecase: Arc<RelaySignalUseCase>,
    pub check_room_usecase: Arc<CheckRoomUseCase>,
    pub get_activity_logs_usecase: Arc<GetActivityLogsUseCase>,
    pub reap_expired_rooms_usecase: Arc<ReapExpiredRoomsUseCase>,
    /// MessagePusher（接続の登録・自分宛ての通知に使用）
    pub message_pusher: Arc<dyn MessagePusher>,
}

impl AppState {
    /// Wire every use case against the given adapters.
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        activity_log: Arc<dyn ActivityLogRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let locks = Arc::new(RoomLocks::new());

        Self {
            create_room_usecase: Arc::new(CreateRoomUseCase::new(
                repository.clone(),
                clock.clone(),
            )),
            verify_room_usecase: Arc::new(VerifyRoomUseCase::new(
                repository.clone(),
                clock.clone(),
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                activity_log.clone(),
                message_pusher.clone(),
                locks.clone(),
                clock.clone(),
            )),
            leave_room_usecase: Arc::new(LeaveRoomUseCase::new(
                repository.clone(),
                activity_log.clone(),
                message_pusher.clone(),
                locks.clone(),
                clock.clone(),
            )),
            update_status_usecase: Arc::new(UpdateStatusUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                locks.clone(),
                clock.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                locks.clone(),
                clock.clone(),
            )),
            relay_signal_usecase: Arc::new(RelaySignalUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            check_room_usecase: Arc::new(CheckRoomUseCase::new(repository.clone(), clock.clone())),
            get_activity_logs_usecase: Arc::new(GetActivityLogsUseCase::new(
                activity_log.clone(),
            )),
            reap_expired_rooms_usecase: Arc::new(ReapExpiredRoomsUseCase::new(
                repository,
                activity_log,
                message_pusher.clone(),
                locks,
                clock,
            )),
            message_pusher,
        }
    }
}
