//! # Alumni Users Crate
//!
//! Member directory and membership management:
//!
//! - **UserService**: directory listing with filters, profiles, member records
//! - **MembershipService**: tier selection and the hosted checkout handoff for
//!   paid tiers, with status polling that activates the membership once paid

pub mod services;
pub mod types;
pub mod utils;

pub use services::{MembershipService, UserService};
pub use types::{
    CreateUserRequest, MembershipCheckout, MembershipCheckoutRequest, MembershipStatus,
    UpdateUserRequest, UserError, UserListQuery, UserResult,
};
