//! UseCase: 入退室ログの取得

use std::sync::Arc;

use crate::domain::{ActivityLogEntry, ActivityLogRepository, RoomId};

use super::error::GetActivityLogsError;

pub struct GetActivityLogsUseCase {
    activity_log: Arc<dyn ActivityLogRepository>,
}

impl GetActivityLogsUseCase {
    pub fn new(activity_log: Arc<dyn ActivityLogRepository>) -> Self {
        Self { activity_log }
    }

    /// 入退室ログを記録順に返す
    ///
    /// `room_id` が不正な形式の場合、該当する記録はないため空を返す。
    pub async fn execute(
        &self,
        room_id: Option<String>,
    ) -> Result<Vec<ActivityLogEntry>, GetActivityLogsError> {
        let filter = match room_id.filter(|id| !id.is_empty()) {
            Some(id) => match RoomId::new(id) {
                Ok(room_id) => Some(room_id),
                Err(_) => return Ok(Vec::new()),
            },
            None => None,
        };
        self.activity_log
            .list_entries(filter)
            .await
            .map_err(|e| GetActivityLogsError::ServerError(e.to_string()))
    }
}
