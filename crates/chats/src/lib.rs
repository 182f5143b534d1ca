//! # Alumni Chats Crate
//!
//! Chat for verified alumni: broadcast rooms scoped by cohort or program track,
//! and pairwise direct messages.
//!
//! ## Architecture
//!
//! - **ChatService**: room visibility, message validation and persistence
//! - **ChatHub**: in-process broadcast channels per room and per user, plus presence
//! - **ChatSession**: the state of one realtime connection (identity, active room)
//! - **Types**: wire events, requests and errors

pub mod hub;
pub mod services;
pub mod session;
pub mod types;
pub mod utils;

pub use hub::ChatHub;
pub use services::ChatService;
pub use session::ChatSession;
pub use types::{
    ChatClientEvent, ChatError, ChatResult, ChatServerEvent, CreateRoomRequest, MessageDraft,
};
