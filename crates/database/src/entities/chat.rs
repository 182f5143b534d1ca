//! Chat room and message entity definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatRoom {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub room_type: RoomType,
    /// Cohort or program track a scoped room belongs to. `None` for general rooms.
    pub scope_value: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewChatRoom {
    pub name: String,
    pub description: Option<String>,
    pub room_type: RoomType,
    pub scope_value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    General,
    Cohort,
    ProgramTrack,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::General => "general",
            RoomType::Cohort => "cohort",
            RoomType::ProgramTrack => "program_track",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(RoomType::General),
            "cohort" => Ok(RoomType::Cohort),
            "program_track" => Ok(RoomType::ProgramTrack),
            unknown => Err(format!("unknown room type '{unknown}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Text,
    Image,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Text => "text",
            MessageType::Image => "image",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable once written. Exactly one of `room_id` / `receiver_id` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatMessage {
    pub id: String,
    pub room_id: Option<String>,
    pub sender_id: String,
    pub sender_name: String,
    pub receiver_id: Option<String>,
    pub content: String,
    pub message_type: MessageType,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn is_direct(&self) -> bool {
        self.receiver_id.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub room_id: Option<String>,
    pub sender_id: String,
    pub sender_name: String,
    pub receiver_id: Option<String>,
    pub content: String,
    pub message_type: MessageType,
    pub image_url: Option<String>,
}

/// One entry per direct-message counterpart, carrying the latest message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub other_user_id: String,
    pub other_user_name: String,
    pub other_user_photo_url: Option<String>,
    pub last_message: ChatMessage,
}
