//! Realtime wire events. Every frame is `{"event": <name>, "data": {...}}`.

use alumni_database::{ChatMessage, MessageType};
use serde::{Deserialize, Serialize};

use super::requests::MessageDraft;

/// Events a client sends over the chat socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ChatClientEvent {
    /// Announce identity; required before anything else
    JoinUser {
        user_id: String,
        #[serde(default)]
        user_name: Option<String>,
    },
    /// Replace the connection's active room
    JoinRoom { room_id: String },
    SendMessage {
        room_id: String,
        #[serde(default)]
        content: String,
        #[serde(default)]
        message_type: MessageType,
        #[serde(default)]
        image_url: Option<String>,
    },
    SendDirectMessage {
        receiver_id: String,
        #[serde(default)]
        content: String,
        #[serde(default)]
        message_type: MessageType,
        #[serde(default)]
        image_url: Option<String>,
    },
}

impl ChatClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ChatClientEvent::JoinUser { .. } => "join_user",
            ChatClientEvent::JoinRoom { .. } => "join_room",
            ChatClientEvent::SendMessage { .. } => "send_message",
            ChatClientEvent::SendDirectMessage { .. } => "send_direct_message",
        }
    }

    /// The message body carried by the send events.
    pub fn draft(&self) -> Option<MessageDraft> {
        match self {
            ChatClientEvent::SendMessage {
                content,
                message_type,
                image_url,
                ..
            }
            | ChatClientEvent::SendDirectMessage {
                content,
                message_type,
                image_url,
                ..
            } => Some(MessageDraft {
                content: content.clone(),
                message_type: *message_type,
                image_url: image_url.clone(),
            }),
            _ => None,
        }
    }
}

/// Events the server pushes to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ChatServerEvent {
    UserJoined { user_id: String, user_name: String },
    JoinedRoom { room_id: String, room_name: String },
    NewMessage(ChatMessage),
    NewDirectMessage(ChatMessage),
    Error { message: String },
}

impl ChatServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChatServerEvent::UserJoined { .. } => "user_joined",
            ChatServerEvent::JoinedRoom { .. } => "joined_room",
            ChatServerEvent::NewMessage(_) => "new_message",
            ChatServerEvent::NewDirectMessage(_) => "new_direct_message",
            ChatServerEvent::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_frames_use_event_and_data() {
        let frame = json!({
            "event": "send_message",
            "data": {"room_id": "r1", "content": "hello"}
        });
        let event: ChatClientEvent = serde_json::from_value(frame).unwrap();
        assert_eq!(event.name(), "send_message");
        let draft = event.draft().unwrap();
        assert_eq!(draft.message_type, MessageType::Text);
        assert_eq!(draft.content, "hello");
    }

    #[test]
    fn server_errors_serialize_with_message() {
        let value = serde_json::to_value(ChatServerEvent::error("nope")).unwrap();
        assert_eq!(value, json!({"event": "error", "data": {"message": "nope"}}));
    }

    #[test]
    fn unknown_events_are_rejected() {
        let frame = json!({"event": "typing", "data": {"room_id": "r1"}});
        assert!(serde_json::from_value::<ChatClientEvent>(frame).is_err());
    }
}
