//! Live submission events over WebSocket.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};

use crate::state::{AppState, HubEvent};

/// GET /inspector
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

async fn handle_websocket(socket: WebSocket, state: AppState) {
    let client_id = uuid::Uuid::new_v4().to_string();
    tracing::info!("Inspector client connected: {}", client_id);

    let (mut sender, mut receiver) = socket.split();
    let mut event_rx = state.broadcaster.subscribe();

    let hello = HubEvent::Connected {
        client_id: client_id.clone(),
    };
    if let Err(e) = sender.send(Message::Text(hello.to_json().into())).await {
        tracing::error!("Failed to greet inspector client {}: {}", client_id, e);
        state.broadcaster.unsubscribe();
        return;
    }

    let send_task = tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            if sender
                .send(Message::Text(event.to_json().into()))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                tracing::debug!("Received from {}: {}", client_id, text.as_str());
                if text.as_str() == "ping" {
                    state.broadcaster.broadcast(HubEvent::Ping);
                }
            }
            Ok(Message::Close(_)) => {
                tracing::info!("Inspector client {} closed gracefully", client_id);
                break;
            }
            Err(e) => {
                tracing::error!("WebSocket error for client {}: {}", client_id, e);
                break;
            }
            _ => {}
        }
    }

    send_task.abort();
    state.broadcaster.unsubscribe();
    tracing::info!("Inspector client disconnected: {}", client_id);
}
