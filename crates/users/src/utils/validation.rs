//! Profile field validation.

use alumni_database::{non_blank, normalize_email};

use crate::types::{CreateUserRequest, UpdateUserRequest, UserError};

const MAX_NAME_LEN: usize = 120;
const MAX_BIO_LEN: usize = 2_000;
const MAX_INTERESTS: usize = 25;
const MAX_INTEREST_LEN: usize = 60;

/// Validated name and normalised email for a new user.
pub fn validate_new_user(request: &CreateUserRequest) -> Result<(String, String), UserError> {
    let name = validate_name(&request.name)?;
    let email = normalize_email(&request.email)
        .ok_or_else(|| UserError::ValidationFailed("Invalid email format".to_string()))?;
    validate_bio(request.bio.as_deref())?;
    validate_interests(&request.interests)?;
    Ok((name, email))
}

pub fn validate_update(request: &UpdateUserRequest) -> Result<(), UserError> {
    if let Some(name) = &request.name {
        validate_name(name)?;
    }
    validate_bio(request.bio.as_deref())?;
    if let Some(interests) = &request.interests {
        validate_interests(interests)?;
    }
    Ok(())
}

fn validate_name(raw: &str) -> Result<String, UserError> {
    let name = non_blank(raw)
        .ok_or_else(|| UserError::ValidationFailed("Name is required".to_string()))?;
    if name.chars().count() > MAX_NAME_LEN {
        return Err(UserError::ValidationFailed("Name is too long".to_string()));
    }
    Ok(name)
}

fn validate_bio(bio: Option<&str>) -> Result<(), UserError> {
    match bio {
        Some(bio) if bio.chars().count() > MAX_BIO_LEN => {
            Err(UserError::ValidationFailed("Bio is too long".to_string()))
        }
        _ => Ok(()),
    }
}

fn validate_interests(interests: &[String]) -> Result<(), UserError> {
    if interests.len() > MAX_INTERESTS {
        return Err(UserError::ValidationFailed("Too many interests".to_string()));
    }
    if interests
        .iter()
        .any(|interest| interest.trim().is_empty() || interest.chars().count() > MAX_INTEREST_LEN)
    {
        return Err(UserError::ValidationFailed(
            "Interests must be short, non-empty labels".to_string(),
        ));
    }
    Ok(())
}
