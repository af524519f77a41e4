//! Shared helpers for integration tests: an in-process server on an ephemeral
//! port and a thin WebSocket client.

#![allow(dead_code)]

use std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};

use focusroom_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryActivityLogRepository, InMemoryRoomRepository},
    },
    ui::{AppState, Server},
};
use focusroom_shared::time::{ManualClock, get_utc_timestamp};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::{Mutex, oneshot},
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

/// How long a client waits for an expected frame
pub const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// In-process server bound to 127.0.0.1:0
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: Arc<AppState>,
    pub clock: Arc<ManualClock>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let clock = Arc::new(ManualClock::new(get_utc_timestamp()));
        let state = Arc::new(AppState::new(
            Arc::new(InMemoryRoomRepository::default()),
            Arc::new(InMemoryActivityLogRepository::default()),
            Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
                HashMap::new(),
            )))),
            clock.clone(),
        ));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let (tx, rx) = oneshot::channel::<()>();
        let server = Server::new(state.clone());
        tokio::spawn(async move {
            let shutdown = async move {
                let _ = rx.await;
            };
            if let Err(e) = server.serve(listener, shutdown).await {
                eprintln!("test server error: {}", e);
            }
        });

        TestServer {
            addr,
            state,
            clock,
            shutdown: Some(tx),
        }
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn ws_url(&self, room_id: &str, name: &str) -> String {
        format!("ws://{}/ws?roomId={}&name={}", self.addr, room_id, name)
    }

    /// `POST /api/rooms/create` and return `(roomId, password)`
    pub async fn create_room(&self, duration_minutes: i64) -> (String, String) {
        let response = reqwest::Client::new()
            .post(self.http_url("/api/rooms/create"))
            .json(&json!({ "durationMinutes": duration_minutes }))
            .send()
            .await
            .expect("create request failed");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        let body: Value = response.json().await.expect("invalid create response");
        (
            body["roomId"].as_str().unwrap_or_default().to_string(),
            body["password"].as_str().unwrap_or_default().to_string(),
        )
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// WebSocket client that speaks the JSON event protocol
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pub connection_id: String,
}

impl TestClient {
    /// Open a socket and consume the `connected` frame
    pub async fn connect(server: &TestServer, room_id: &str, name: &str) -> Self {
        let (ws, _) = connect_async(server.ws_url(room_id, name))
            .await
            .expect("WebSocket handshake failed");
        let mut client = TestClient {
            ws,
            connection_id: String::new(),
        };
        let connected = client.recv_type("connected").await;
        client.connection_id = connected["connectionId"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        client
    }

    /// Connect and join; returns the `room-details` frame
    pub async fn join(
        server: &TestServer,
        room_id: &str,
        password: &str,
        name: &str,
    ) -> (Self, Value) {
        let mut client = Self::connect(server, room_id, name).await;
        client
            .send(json!({"type": "join-room", "roomId": room_id, "name": name, "password": password}))
            .await;
        let details = client.recv_type("room-details").await;
        (client, details)
    }

    pub async fn send(&mut self, event: Value) {
        self.ws
            .send(Message::text(event.to_string()))
            .await
            .expect("Failed to send frame");
    }

    /// Next JSON text frame
    pub async fn recv(&mut self) -> Value {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .expect("Timed out waiting for a frame")
                .expect("Socket closed")
                .expect("WebSocket error");
            if let Message::Text(text) = frame {
                return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
            }
        }
    }

    /// Skip frames until one with the given `type` arrives
    pub async fn recv_type(&mut self, event_type: &str) -> Value {
        loop {
            let frame = self.recv().await;
            if frame["type"] == event_type {
                return frame;
            }
        }
    }

    /// Assert that no text frame arrives within `wait`
    pub async fn expect_silence(&mut self, wait: Duration) {
        if let Ok(Some(Ok(Message::Text(text)))) = tokio::time::timeout(wait, self.ws.next()).await {
            panic!("Unexpected frame: {}", text.as_str());
        }
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}
