//! Rooms, room messages and direct messages.

use alumni_config::ChatConfig;
use alumni_database::{
    ChatMessage, ChatRepository, ChatRoom, ConversationSummary, NewChatMessage, User,
    UserRepository,
};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::types::{ChatError, ChatResult, CreateRoomRequest, MessageDraft};
use crate::utils::{validate_draft, validate_new_room, RoomAccess};

#[derive(Clone)]
pub struct ChatService {
    chats: ChatRepository,
    users: UserRepository,
    config: ChatConfig,
}

impl ChatService {
    pub fn new(pool: SqlitePool, config: ChatConfig) -> Self {
        Self {
            chats: ChatRepository::new(pool.clone()),
            users: UserRepository::new(pool),
            config,
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// The member behind `user_id`, provided they are verified alumni.
    pub async fn verified_member(&self, user_id: &str) -> ChatResult<User> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ChatError::user_not_found(user_id))?;
        RoomAccess::ensure_verified(&user)?;
        Ok(user)
    }

    pub async fn create_room(&self, request: CreateRoomRequest) -> ChatResult<ChatRoom> {
        let room = validate_new_room(&request)?;
        Ok(self.chats.create_room(&room).await?)
    }

    pub async fn list_rooms(&self) -> ChatResult<Vec<ChatRoom>> {
        Ok(self.chats.list_rooms().await?)
    }

    /// General rooms plus the rooms for the member's cohort and program track.
    pub async fn rooms_for_user(&self, user_id: &str) -> ChatResult<Vec<ChatRoom>> {
        let user = self.verified_member(user_id).await?;
        Ok(self
            .chats
            .list_visible_rooms(user.cohort.as_deref(), user.program_track.as_deref())
            .await?)
    }

    /// Look up a room and check the member may see it.
    pub async fn room_for(&self, room_id: &str, user: &User) -> ChatResult<ChatRoom> {
        let room = self
            .chats
            .find_room(room_id)
            .await?
            .ok_or_else(|| ChatError::room_not_found(room_id))?;
        RoomAccess::ensure_can_view(&room, user)?;
        Ok(room)
    }

    /// Recent room history, oldest first.
    pub async fn room_messages(
        &self,
        room_id: &str,
        user_id: &str,
        limit: Option<i64>,
    ) -> ChatResult<Vec<ChatMessage>> {
        let user = self.verified_member(user_id).await?;
        let room = self.room_for(room_id, &user).await?;
        Ok(self.chats.room_messages(&room.id, self.history_limit(limit)).await?)
    }

    pub async fn post_room_message(
        &self,
        sender: &User,
        room_id: &str,
        draft: &MessageDraft,
    ) -> ChatResult<ChatMessage> {
        let message = validate_draft(draft, self.config.max_message_length)?;
        let room = self.room_for(room_id, sender).await?;

        let stored = self
            .chats
            .insert_message(&NewChatMessage {
                room_id: Some(room.id),
                sender_id: sender.id.clone(),
                sender_name: sender.name.clone(),
                receiver_id: None,
                content: message.content,
                message_type: message.message_type,
                image_url: message.image_url,
            })
            .await?;

        debug!(message_id = %stored.id, room_id = %room_id, sender_id = %sender.id, "room message stored");
        Ok(stored)
    }

    pub async fn post_direct_message(
        &self,
        sender: &User,
        receiver_id: &str,
        draft: &MessageDraft,
    ) -> ChatResult<ChatMessage> {
        let message = validate_draft(draft, self.config.max_message_length)?;
        if receiver_id == sender.id {
            return Err(ChatError::validation("Cannot send a direct message to yourself"));
        }
        let receiver = self
            .users
            .find_by_id(receiver_id)
            .await?
            .ok_or_else(|| ChatError::user_not_found(receiver_id))?;

        let stored = self
            .chats
            .insert_message(&NewChatMessage {
                room_id: None,
                sender_id: sender.id.clone(),
                sender_name: sender.name.clone(),
                receiver_id: Some(receiver.id),
                content: message.content,
                message_type: message.message_type,
                image_url: message.image_url,
            })
            .await?;

        info!(message_id = %stored.id, sender_id = %sender.id, receiver_id = %receiver_id, "direct message stored");
        Ok(stored)
    }

    pub async fn direct_messages(
        &self,
        user_id: &str,
        other_user_id: &str,
        limit: Option<i64>,
    ) -> ChatResult<Vec<ChatMessage>> {
        let user = self.verified_member(user_id).await?;
        Ok(self
            .chats
            .direct_messages(&user.id, other_user_id, self.history_limit(limit))
            .await?)
    }

    /// One entry per counterpart, newest conversation first.
    pub async fn conversations(&self, user_id: &str) -> ChatResult<Vec<ConversationSummary>> {
        let user = self.verified_member(user_id).await?;
        Ok(self.chats.conversations(&user.id).await?)
    }

    fn history_limit(&self, requested: Option<i64>) -> i64 {
        let max = self.config.history_limit.max(1);
        requested.unwrap_or(max).clamp(1, max)
    }
}
