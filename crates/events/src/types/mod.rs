pub mod errors;
pub mod requests;

pub use errors::{EventError, EventResult};
pub use requests::{CreateEventRequest, EventListQuery, RegisterRequest, RegistrationReceipt};
