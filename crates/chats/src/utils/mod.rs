pub mod permissions;
pub mod validation;

pub use permissions::RoomAccess;
pub use validation::{validate_draft, validate_new_room, ValidMessage};
