//! Chat WebSocket transport.
//!
//! Each socket gets a [`ChatSession`]. Inbound text frames are decoded into
//! client events and handed to the session; everything the session emits is
//! drained by a writer task into the socket.

use std::sync::Arc;

use alumni_chats::{ChatClientEvent, ChatServerEvent, ChatSession};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::state::GatewayState;

pub async fn chat_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<GatewayState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_chat_websocket(socket, state))
}

async fn handle_chat_websocket(socket: WebSocket, state: Arc<GatewayState>) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) =
        mpsc::channel::<ChatServerEvent>(state.config.chat.channel_capacity.max(1));

    let mut session = ChatSession::new(
        state.chat_service.clone(),
        Arc::clone(&state.chat_hub),
        outbound_tx,
    );
    debug!("chat socket opened");

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(err) => {
                    warn!(event = event.name(), error = %err, "failed to encode chat event");
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ChatClientEvent>(&text) {
                        Ok(event) => session.handle(event).await,
                        Err(err) => session.reject_frame(&err.to_string()).await,
                    }
                }
                Some(Ok(Message::Binary(_))) => {
                    session.reject_frame("binary frames are not supported").await;
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    debug!(error = %err, "chat socket read failed");
                    break;
                }
            },
            _ = &mut send_task => break,
        }
    }

    session.close().await;
    debug!("chat socket closed");
    send_task.abort();
}
