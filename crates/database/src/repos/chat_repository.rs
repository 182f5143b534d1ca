//! Chat repository: rooms, room history and direct messages.

use crate::entities::chat::{
    ChatMessage, ChatRoom, ConversationSummary, NewChatMessage, NewChatRoom,
};
use crate::types::{DatabaseError, DatabaseResult};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};
use tracing::{debug, info};

const ROOM_COLUMNS: &str = "id, name, description, room_type, scope_value, created_at";
const MESSAGE_COLUMNS: &str =
    "id, room_id, sender_id, sender_name, receiver_id, content, message_type, image_url, created_at";

#[derive(Clone)]
pub struct ChatRepository {
    pool: SqlitePool,
}

impl ChatRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_room(&self, room: &NewChatRoom) -> DatabaseResult<ChatRoom> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO chat_rooms (id, name, description, room_type, scope_value, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&room.name)
        .bind(&room.description)
        .bind(room.room_type)
        .bind(&room.scope_value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(room_id = %id, name = %room.name, room_type = %room.room_type, "chat room created");

        self.find_room(&id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("chat room", &id))
    }

    pub async fn find_room(&self, id: &str) -> DatabaseResult<Option<ChatRoom>> {
        let query = format!("SELECT {ROOM_COLUMNS} FROM chat_rooms WHERE id = ?");
        let room = sqlx::query_as::<_, ChatRoom>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(room)
    }

    /// General rooms plus the scoped rooms matching the given cohort and track.
    pub async fn list_visible_rooms(
        &self,
        cohort: Option<&str>,
        program_track: Option<&str>,
    ) -> DatabaseResult<Vec<ChatRoom>> {
        let query = format!(
            "SELECT {ROOM_COLUMNS} FROM chat_rooms \
             WHERE room_type = 'general' \
             OR (room_type = 'cohort' AND scope_value = ?) \
             OR (room_type = 'program_track' AND scope_value = ?) \
             ORDER BY room_type ASC, name ASC"
        );
        let rooms = sqlx::query_as::<_, ChatRoom>(&query)
            .bind(cohort)
            .bind(program_track)
            .fetch_all(&self.pool)
            .await?;
        Ok(rooms)
    }

    pub async fn list_rooms(&self) -> DatabaseResult<Vec<ChatRoom>> {
        let query = format!("SELECT {ROOM_COLUMNS} FROM chat_rooms ORDER BY room_type ASC, name ASC");
        let rooms = sqlx::query_as::<_, ChatRoom>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rooms)
    }

    pub async fn insert_message(&self, message: &NewChatMessage) -> DatabaseResult<ChatMessage> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO chat_messages (id, room_id, sender_id, sender_name, receiver_id, content, \
             message_type, image_url, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&message.room_id)
        .bind(&message.sender_id)
        .bind(&message.sender_name)
        .bind(&message.receiver_id)
        .bind(&message.content)
        .bind(message.message_type)
        .bind(&message.image_url)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!(message_id = %id, room_id = ?message.room_id, receiver_id = ?message.receiver_id, "chat message stored");

        let query = format!("SELECT {MESSAGE_COLUMNS} FROM chat_messages WHERE id = ?");
        let stored = sqlx::query_as::<_, ChatMessage>(&query)
            .bind(&id)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }

    /// The latest `limit` messages of a room, oldest first.
    pub async fn room_messages(&self, room_id: &str, limit: i64) -> DatabaseResult<Vec<ChatMessage>> {
        let query = format!(
            "SELECT {MESSAGE_COLUMNS} FROM chat_messages WHERE room_id = ? \
             ORDER BY created_at DESC, rowid DESC LIMIT ?"
        );
        let mut messages = sqlx::query_as::<_, ChatMessage>(&query)
            .bind(room_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        messages.reverse();
        Ok(messages)
    }

    /// The latest `limit` direct messages between two users, oldest first.
    pub async fn direct_messages(
        &self,
        user_id: &str,
        other_user_id: &str,
        limit: i64,
    ) -> DatabaseResult<Vec<ChatMessage>> {
        let query = format!(
            "SELECT {MESSAGE_COLUMNS} FROM chat_messages \
             WHERE (sender_id = ? AND receiver_id = ?) OR (sender_id = ? AND receiver_id = ?) \
             ORDER BY created_at DESC, rowid DESC LIMIT ?"
        );
        let mut messages = sqlx::query_as::<_, ChatMessage>(&query)
            .bind(user_id)
            .bind(other_user_id)
            .bind(other_user_id)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        messages.reverse();
        Ok(messages)
    }

    /// One summary per direct-message counterpart, most recent conversation first.
    pub async fn conversations(&self, user_id: &str) -> DatabaseResult<Vec<ConversationSummary>> {
        let rows = sqlx::query(
            "SELECT m.id, m.room_id, m.sender_id, m.sender_name, m.receiver_id, m.content, \
             m.message_type, m.image_url, m.created_at, m.other_id, \
             u.name AS other_name, u.profile_photo_url AS other_photo \
             FROM ( \
                SELECT cm.*, \
                  CASE WHEN cm.sender_id = ? THEN cm.receiver_id ELSE cm.sender_id END AS other_id, \
                  ROW_NUMBER() OVER ( \
                    PARTITION BY CASE WHEN cm.sender_id = ? THEN cm.receiver_id ELSE cm.sender_id END \
                    ORDER BY cm.created_at DESC, cm.rowid DESC \
                  ) AS rn \
                FROM chat_messages cm \
                WHERE cm.receiver_id IS NOT NULL AND (cm.sender_id = ? OR cm.receiver_id = ?) \
             ) m \
             JOIN users u ON u.id = m.other_id \
             WHERE m.rn = 1 \
             ORDER BY m.created_at DESC",
        )
        .bind(user_id)
        .bind(user_id)
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(conversation_from_row)
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(DatabaseError::from)
    }
}

fn conversation_from_row(row: &SqliteRow) -> Result<ConversationSummary, sqlx::Error> {
    Ok(ConversationSummary {
        other_user_id: row.try_get("other_id")?,
        other_user_name: row.try_get("other_name")?,
        other_user_photo_url: row.try_get("other_photo")?,
        last_message: ChatMessage::from_row(row)?,
    })
}
