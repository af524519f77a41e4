//! WebSocket connection handlers.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        ConnectInfo, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{ConnectionId, RoomEvent, SignalPayload},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::{JoinRoomCommand, RelayOutcome, SendMessageCommand, SendMessageError},
};

/// Query parameters for the WebSocket handshake
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectQuery {
    pub room_id: Option<String>,
    pub name: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(source_address): ConnectInfo<SocketAddr>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    if is_blank(&query.room_id) || is_blank(&query.name) {
        tracing::warn!(%source_address, "Rejected handshake without roomId / name");
        return Err(StatusCode::BAD_REQUEST);
    }

    let connection_id = ConnectionId::generate();
    tracing::info!(
        connection_id = %connection_id,
        %source_address,
        room_id = query.room_id.as_deref().unwrap_or_default(),
        "WebSocket handshake accepted"
    );

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id, source_address)))
}

/// Drains the outbound channel into the socket until either side closes.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    source_address: SocketAddr,
) {
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::unbounded_channel();
    state
        .message_pusher
        .register_client(connection_id.clone(), tx)
        .await;

    let mut session = Session {
        state: state.clone(),
        connection_id: connection_id.clone(),
        source_address,
        current_room: None,
    };
    session
        .push(&RoomEvent::Connected {
            connection_id: connection_id.clone(),
        })
        .await;

    let mut send_task = pusher_loop(rx, sender);

    // 受信ループはイベントの合間でのみ停止する（処理中のイベントは完了させる）
    let stop = CancellationToken::new();
    let recv_stop = stop.clone();
    let mut recv_task = tokio::spawn(async move {
        loop {
            let frame = tokio::select! {
                biased;
                _ = recv_stop.cancelled() => break,
                frame = receiver.next() => frame,
            };
            match frame {
                Some(Ok(Message::Text(text))) => session.handle_text(text.as_str()).await,
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!(connection_id = %session.connection_id, "Client closed connection");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(connection_id = %session.connection_id, "WebSocket error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => {
            stop.cancel();
            if let Err(e) = recv_task.await {
                tracing::warn!(connection_id = %connection_id, "Receive loop ended abnormally: {}", e);
            }
        }
    };

    if let Err(e) = state.leave_room_usecase.execute(&connection_id).await {
        tracing::warn!(connection_id = %connection_id, "Failed to leave on disconnect: {}", e);
    }
    state.message_pusher.unregister_client(&connection_id).await;
    tracing::info!(connection_id = %connection_id, "Connection closed");
}

/// Per-connection event dispatcher. Events are handled one at a time in arrival order.
struct Session {
    state: Arc<AppState>,
    connection_id: ConnectionId,
    source_address: SocketAddr,
    current_room: Option<String>,
}

impl Session {
    async fn push(&self, event: &RoomEvent) {
        if let Err(e) = self
            .state
            .message_pusher
            .push_to(&self.connection_id, event)
            .await
        {
            tracing::warn!(connection_id = %self.connection_id, "Failed to push event: {}", e);
        }
    }

    async fn handle_text(&mut self, text: &str) {
        let event = match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(connection_id = %self.connection_id, "Ignoring unparseable frame: {}", e);
                return;
            }
        };

        match event {
            ClientEvent::JoinRoom {
                room_id,
                name,
                password,
            } => self.join_room(room_id, name, password).await,
            ClientEvent::Signal { to, payload } => self.relay_signal(to, payload).await,
            ClientEvent::SendMessage {
                room_id,
                sender,
                content,
                is_reaction,
            } => {
                self.send_message(SendMessageCommand {
                    connection_id: self.connection_id.clone(),
                    room_id,
                    sender,
                    content,
                    is_reaction,
                })
                .await
            }
            ClientEvent::UserUpdate {
                room_id,
                is_muted,
                is_camera_off,
            } => {
                if let Err(e) = self
                    .state
                    .update_status_usecase
                    .execute(&self.connection_id, room_id, is_muted, is_camera_off)
                    .await
                {
                    tracing::debug!(connection_id = %self.connection_id, "Status update dropped: {:?}", e);
                }
            }
            ClientEvent::LeaveRoom => self.leave_room().await,
            ClientEvent::CheckRoom {
                room_id,
                request_id,
            } => match self.state.check_room_usecase.execute(room_id).await {
                Ok(status) => {
                    self.push(&RoomEvent::RoomStatus { request_id, status })
                        .await
                }
                Err(e) => tracing::error!("Failed to check room: {:?}", e),
            },
        }
    }

    async fn join_room(&mut self, room_id: String, name: String, password: String) {
        // 別の Room に入室する場合は現在の Room から退出する
        if self
            .current_room
            .as_deref()
            .is_some_and(|current| current != room_id)
        {
            self.leave_room().await;
        }

        let command = JoinRoomCommand {
            room_id,
            name,
            password,
            connection_id: self.connection_id.clone(),
            source_address: Some(self.source_address),
        };
        match self.state.join_room_usecase.execute(command).await {
            Ok(snapshot) => self.current_room = Some(snapshot.room_id.into_string()),
            Err(e) => {
                tracing::info!(connection_id = %self.connection_id, "Join rejected: {:?}", e);
                self.push(&RoomEvent::JoinError {
                    reason: e.to_string(),
                })
                .await;
            }
        }
    }

    async fn leave_room(&mut self) {
        self.current_room = None;
        if let Err(e) = self
            .state
            .leave_room_usecase
            .execute(&self.connection_id)
            .await
        {
            tracing::warn!(connection_id = %self.connection_id, "Failed to leave room: {}", e);
        }
    }

    async fn relay_signal(&self, to: String, payload: serde_json::Value) {
        let (Ok(to), Ok(payload)) = (ConnectionId::new(to), SignalPayload::new(payload)) else {
            tracing::debug!(connection_id = %self.connection_id, "Dropping malformed signal");
            return;
        };
        if self
            .state
            .relay_signal_usecase
            .execute(&self.connection_id, &to, payload)
            .await
            == RelayOutcome::Delivered
        {
            tracing::debug!(from = %self.connection_id, to = %to, "Signal relayed");
        }
    }

    async fn send_message(&self, command: SendMessageCommand) {
        if let Err(e) = self.state.send_message_usecase.execute(command).await {
            if let SendMessageError::ServerError(detail) = &e {
                tracing::error!(connection_id = %self.connection_id, "Failed to send message: {}", detail);
            }
            self.push(&RoomEvent::MessageError {
                reason: e.to_string(),
            })
            .await;
        }
    }
}
