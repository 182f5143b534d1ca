//! Validation for outgoing messages and new rooms.

use alumni_database::{non_blank, MessageType, NewChatRoom, RoomType};

use crate::types::{ChatError, ChatResult, CreateRoomRequest, MessageDraft};

/// A draft that passed validation, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidMessage {
    pub content: String,
    pub message_type: MessageType,
    pub image_url: Option<String>,
}

pub fn validate_draft(draft: &MessageDraft, max_chars: usize) -> ChatResult<ValidMessage> {
    let image_url = draft.image_url.as_deref().and_then(non_blank);
    if draft.message_type == MessageType::Image && image_url.is_none() {
        return Err(ChatError::validation("Image messages require an image_url"));
    }

    let content = draft.content.trim();
    if content.is_empty() && image_url.is_none() {
        return Err(ChatError::validation("Message content cannot be empty"));
    }
    if content.chars().count() > max_chars {
        return Err(ChatError::validation(format!(
            "Message content must be at most {max_chars} characters"
        )));
    }

    Ok(ValidMessage {
        content: content.to_string(),
        message_type: draft.message_type,
        image_url,
    })
}

pub fn validate_new_room(request: &CreateRoomRequest) -> ChatResult<NewChatRoom> {
    let name = non_blank(&request.name)
        .ok_or_else(|| ChatError::validation("Room name is required"))?;
    let room_type: RoomType = request
        .room_type
        .trim()
        .parse()
        .map_err(ChatError::validation)?;

    let scope_value = match room_type {
        RoomType::General => None,
        RoomType::Cohort | RoomType::ProgramTrack => Some(
            request
                .scope_value
                .as_deref()
                .and_then(non_blank)
                .ok_or_else(|| {
                    ChatError::validation(format!("{room_type} rooms require a scope_value"))
                })?,
        ),
    };

    Ok(NewChatRoom {
        name,
        description: request.description.as_deref().and_then(non_blank),
        room_type,
        scope_value,
    })
}
