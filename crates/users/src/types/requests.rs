//! Request and response shapes for user and membership operations.

use alumni_database::{MembershipTier, UserFilter, UserUpdate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub membership_tier: Option<MembershipTier>,
    pub bio: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub cohort: Option<String>,
    pub program_track: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub is_verified_alumni: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub cohort: Option<String>,
    pub program_track: Option<String>,
    pub interests: Option<Vec<String>>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(request: UpdateUserRequest) -> Self {
        UserUpdate {
            name: request.name,
            bio: request.bio,
            birthday: request.birthday,
            cohort: request.cohort,
            program_track: request.program_track,
            interests: request.interests,
            profile_photo_url: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub cohort: Option<String>,
    pub program_track: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

impl UserListQuery {
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 500;

    pub fn into_filter(self) -> UserFilter {
        let blank_to_none =
            |value: Option<String>| value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        UserFilter {
            cohort: blank_to_none(self.cohort),
            program_track: blank_to_none(self.program_track),
            search: blank_to_none(self.search),
            limit: self
                .limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
            skip: self.skip.unwrap_or(0).max(0),
        }
    }
}

/// Tier is taken as a raw string so unknown tiers map to a dedicated error.
#[derive(Debug, Clone, Deserialize)]
pub struct MembershipCheckoutRequest {
    pub membership_tier: String,
    pub user_email: String,
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MembershipCheckout {
    /// Free tier: the member record is created immediately.
    Activated { message: String, member_id: String },
    /// Paid tier: the client is redirected to the hosted checkout page.
    Checkout {
        checkout_url: String,
        session_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MembershipStatus {
    pub status: String,
    pub payment_status: String,
    /// Minor currency units.
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_are_dropped_and_paging_clamped() {
        let filter = UserListQuery {
            cohort: Some("  ".into()),
            program_track: Some(" Data Science ".into()),
            search: None,
            limit: Some(0),
            skip: Some(-1),
        }
        .into_filter();

        assert_eq!(filter.cohort, None);
        assert_eq!(filter.program_track.as_deref(), Some("Data Science"));
        assert_eq!(filter.limit, 1);
        assert_eq!(filter.skip, 0);
    }

    #[test]
    fn checkout_responses_serialize_flat() {
        let free = MembershipCheckout::Activated {
            message: "Free membership created successfully".into(),
            member_id: "m1".into(),
        };
        let json = serde_json::to_value(&free).unwrap();
        assert_eq!(json["member_id"], "m1");
        assert!(json.get("checkout_url").is_none());
    }
}
