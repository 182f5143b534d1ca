pub mod errors;
pub mod requests;

pub use errors::{UserError, UserResult};
pub use requests::{
    CreateUserRequest, MembershipCheckout, MembershipCheckoutRequest, MembershipStatus,
    UpdateUserRequest, UserListQuery,
};
