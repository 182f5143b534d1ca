//! # Alumni Events Crate
//!
//! Event catalog plus the admission-control core: registrations take a seat
//! while capacity remains, join the waitlist otherwise, and a cancelled seat
//! is handed to the oldest waitlisted registrant.

pub mod admission;
pub mod service;
pub mod types;

pub use admission::{Admission, Availability};
pub use service::EventService;
pub use types::{
    CreateEventRequest, EventError, EventListQuery, EventResult, RegisterRequest,
    RegistrationReceipt,
};
