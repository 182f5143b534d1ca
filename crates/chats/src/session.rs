//! One realtime connection.
//!
//! A session starts anonymous. `join_user` binds it to a verified member and
//! subscribes it to that member's channel; `join_room` swaps the single active
//! room. Switching to another member drops the active room. Everything the client should see is pushed into `outbound`, which the
//! transport drains.

use std::sync::Arc;

use alumni_database::User;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::hub::ChatHub;
use crate::services::ChatService;
use crate::types::{ChatClientEvent, ChatError, ChatResult, ChatServerEvent, MessageDraft};

struct ActiveRoom {
    room_id: String,
    forwarder: JoinHandle<()>,
}

pub struct ChatSession {
    service: ChatService,
    hub: Arc<ChatHub>,
    outbound: mpsc::Sender<ChatServerEvent>,
    user: Option<User>,
    user_forwarder: Option<JoinHandle<()>>,
    room: Option<ActiveRoom>,
}

impl ChatSession {
    pub fn new(
        service: ChatService,
        hub: Arc<ChatHub>,
        outbound: mpsc::Sender<ChatServerEvent>,
    ) -> Self {
        Self {
            service,
            hub,
            outbound,
            user: None,
            user_forwarder: None,
            room: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn active_room(&self) -> Option<&str> {
        self.room.as_ref().map(|room| room.room_id.as_str())
    }

    /// Handle one client event. Failures are reported to the client as `error`
    /// events and never end the session.
    pub async fn handle(&mut self, event: ChatClientEvent) {
        let name = event.name();
        if let Err(error) = self.dispatch(event).await {
            debug!(event = name, error = %error, "chat event rejected");
            self.reply(ChatServerEvent::error(error.to_string())).await;
        }
    }

    /// Frames that do not parse as a client event.
    pub async fn reject_frame(&self, reason: &str) {
        self.reply(ChatServerEvent::error(format!("Invalid chat event: {reason}")))
            .await;
    }

    async fn dispatch(&mut self, event: ChatClientEvent) -> ChatResult<()> {
        let draft = event.draft();
        match event {
            ChatClientEvent::JoinUser { user_id, user_name } => {
                self.join_user(&user_id, user_name).await
            }
            ChatClientEvent::JoinRoom { room_id } => self.join_room(&room_id).await,
            ChatClientEvent::SendMessage { room_id, .. } => {
                let draft = draft.unwrap_or_default();
                self.send_room_message(&room_id, &draft).await
            }
            ChatClientEvent::SendDirectMessage { receiver_id, .. } => {
                let draft = draft.unwrap_or_default();
                self.send_direct_message(&receiver_id, &draft).await
            }
        }
    }

    async fn join_user(&mut self, user_id: &str, user_name: Option<String>) -> ChatResult<()> {
        let user = self.service.verified_member(user_id).await?;

        if let Some(previous) = self.user.take() {
            if previous.id == user.id {
                self.user = Some(previous);
                return self.announce_user(user_name).await;
            }
            // Room access was checked for the previous identity.
            self.leave_room().await;
            self.leave_user(&previous.id).await;
        }

        let receiver = self.hub.connect_user(&user.id).await;
        self.user_forwarder = Some(spawn_forwarder(receiver, self.outbound.clone()));
        info!(user_id = %user.id, "chat user joined");
        self.user = Some(user);
        self.announce_user(user_name).await
    }

    async fn announce_user(&self, user_name: Option<String>) -> ChatResult<()> {
        let user = self.require_user()?;
        self.reply(ChatServerEvent::UserJoined {
            user_id: user.id.clone(),
            user_name: user_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| user.name.clone()),
        })
        .await;
        Ok(())
    }

    async fn join_room(&mut self, room_id: &str) -> ChatResult<()> {
        let user = self.require_user()?;
        let room = self.service.room_for(room_id, user).await?;

        self.leave_room().await;
        let receiver = self.hub.subscribe_room(&room.id).await;
        self.room = Some(ActiveRoom {
            room_id: room.id.clone(),
            forwarder: spawn_forwarder(receiver, self.outbound.clone()),
        });

        debug!(room_id = %room.id, "chat room joined");
        self.reply(ChatServerEvent::JoinedRoom {
            room_id: room.id,
            room_name: room.name,
        })
        .await;
        Ok(())
    }

    async fn send_room_message(&self, room_id: &str, draft: &MessageDraft) -> ChatResult<()> {
        let user = self.require_user()?;
        let message = self.service.post_room_message(user, room_id, draft).await?;
        self.hub
            .publish_to_room(room_id, ChatServerEvent::NewMessage(message))
            .await;
        Ok(())
    }

    async fn send_direct_message(&self, receiver_id: &str, draft: &MessageDraft) -> ChatResult<()> {
        let user = self.require_user()?;
        let message = self
            .service
            .post_direct_message(user, receiver_id, draft)
            .await?;
        let event = ChatServerEvent::NewDirectMessage(message);
        self.hub.publish_to_user(receiver_id, event.clone()).await;
        self.hub.publish_to_user(&user.id, event).await;
        Ok(())
    }

    /// Release everything the session holds in the hub.
    pub async fn close(mut self) {
        self.leave_room().await;
        if let Some(user) = self.user.take() {
            self.leave_user(&user.id).await;
            info!(user_id = %user.id, "chat user left");
        }
    }

    async fn leave_room(&mut self) {
        if let Some(active) = self.room.take() {
            active.forwarder.abort();
            // The receiver is dropped with the aborted task; let it finish first.
            let _ = active.forwarder.await;
            self.hub.prune_room(&active.room_id).await;
        }
    }

    async fn leave_user(&mut self, user_id: &str) {
        if let Some(forwarder) = self.user_forwarder.take() {
            forwarder.abort();
            let _ = forwarder.await;
        }
        self.hub.disconnect_user(user_id).await;
    }

    fn require_user(&self) -> ChatResult<&User> {
        self.user
            .as_ref()
            .ok_or_else(|| ChatError::access_denied("Join the chat with join_user first"))
    }

    async fn reply(&self, event: ChatServerEvent) {
        if self.outbound.send(event).await.is_err() {
            debug!("chat connection already closed");
        }
    }
}

fn spawn_forwarder(
    mut receiver: broadcast::Receiver<ChatServerEvent>,
    outbound: mpsc::Sender<ChatServerEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if outbound.send(event).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "chat connection lagging, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
