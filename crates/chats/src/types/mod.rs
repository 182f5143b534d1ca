pub mod errors;
pub mod events;
pub mod requests;

pub use errors::{ChatError, ChatResult};
pub use events::{ChatClientEvent, ChatServerEvent};
pub use requests::{CreateRoomRequest, MessageDraft};
