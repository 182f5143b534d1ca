//! Request types for the chat REST surface.

use alumni_database::MessageType;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_room_type")]
    pub room_type: String,
    /// Cohort or program track for scoped rooms.
    #[serde(default)]
    pub scope_value: Option<String>,
}

fn default_room_type() -> String {
    "general".to_string()
}

/// Body of an outgoing message before validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageDraft {
    pub content: String,
    pub message_type: MessageType,
    pub image_url: Option<String>,
}
