pub mod errors;
pub mod validation;

pub use errors::DatabaseError;
pub use validation::{non_blank, normalize_email};

pub type DatabaseResult<T> = Result<T, DatabaseError>;
