pub mod membership_service;
pub mod user_service;

pub use membership_service::MembershipService;
pub use user_service::UserService;
