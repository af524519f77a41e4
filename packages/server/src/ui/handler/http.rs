//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    infrastructure::dto::http::{
        ActivityLogEntryDto, ActivityQuery, CreateRoomRequest, CreateRoomResponse, ErrorResponse,
        JoinRoomRequest, JoinRoomResponse, RoomStatusDto,
    },
    ui::state::AppState,
    usecase::{CheckRoomError, CreateRoomError, GetActivityLogsError, VerifyRoomError},
};

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Create a room with a limited lifetime.
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateRoomRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Rejected create-room body: {}", rejection.body_text());
            return error_response(
                StatusCode::BAD_REQUEST,
                CreateRoomError::InvalidDuration.to_string(),
            );
        }
    };

    match state
        .create_room_usecase
        .execute(request.duration_minutes, request.name)
        .await
    {
        Ok(room) => (StatusCode::CREATED, Json(CreateRoomResponse::from(room))).into_response(),
        Err(e @ (CreateRoomError::InvalidDuration | CreateRoomError::InvalidName(_))) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e @ CreateRoomError::ServerError(_)) => {
            tracing::error!("Failed to create room: {:?}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Check a room id / password pair before opening the realtime channel.
pub async fn join_room(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<JoinRoomRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return not_found(VerifyRoomError::NotFound.to_string());
    };

    match state
        .verify_room_usecase
        .execute(request.room_id, request.password)
        .await
    {
        Ok(()) => Json(JoinRoomResponse {
            success: true,
            message: Some("Room joined".to_string()),
            error: None,
        })
        .into_response(),
        Err(e @ (VerifyRoomError::NotFound | VerifyRoomError::Expired)) => {
            not_found(e.to_string())
        }
        Err(e @ VerifyRoomError::ServerError(_)) => {
            tracing::error!("Failed to verify room: {:?}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn not_found(error: String) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(JoinRoomResponse {
            success: false,
            message: None,
            error: Some(error),
        }),
    )
        .into_response()
}

/// Public room status (no password required).
pub async fn get_room_status(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomStatusDto>, Response> {
    match state.check_room_usecase.execute(room_id).await {
        Ok(status) => Ok(Json(RoomStatusDto::from(status))),
        Err(e @ CheckRoomError::ServerError(_)) => {
            tracing::error!("Failed to check room: {:?}", e);
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// Join / leave records, optionally filtered by room.
pub async fn get_activity_logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityLogEntryDto>>, Response> {
    match state.get_activity_logs_usecase.execute(query.room_id).await {
        Ok(entries) => Ok(Json(
            entries.into_iter().map(ActivityLogEntryDto::from).collect(),
        )),
        Err(e @ GetActivityLogsError::ServerError(_)) => {
            tracing::error!("Failed to load activity logs: {:?}", e);
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
