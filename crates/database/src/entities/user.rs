//! Member directory entity definitions

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row};
use std::fmt;
use std::str::FromStr;

/// A member of the association. Directory profile and membership record share one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub membership_tier: MembershipTier,
    pub payment_status: MemberPaymentStatus,
    pub bio: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub cohort: Option<String>,
    pub program_track: Option<String>,
    pub interests: Vec<String>,
    pub profile_photo_url: Option<String>,
    pub is_verified_alumni: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for User {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let interests: Json<Vec<String>> = row.try_get("interests")?;
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            membership_tier: row.try_get("membership_tier")?,
            payment_status: row.try_get("payment_status")?,
            bio: row.try_get("bio")?,
            birthday: row.try_get("birthday")?,
            cohort: row.try_get("cohort")?,
            program_track: row.try_get("program_track")?,
            interests: interests.0,
            profile_photo_url: row.try_get("profile_photo_url")?,
            is_verified_alumni: row.try_get("is_verified_alumni")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub membership_tier: MembershipTier,
    pub payment_status: MemberPaymentStatus,
    pub bio: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub cohort: Option<String>,
    pub program_track: Option<String>,
    pub interests: Vec<String>,
    pub is_verified_alumni: bool,
}

/// Profile fields a member may change. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub cohort: Option<String>,
    pub program_track: Option<String>,
    pub interests: Option<Vec<String>>,
    pub profile_photo_url: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.bio.is_none()
            && self.birthday.is_none()
            && self.cohort.is_none()
            && self.program_track.is_none()
            && self.interests.is_none()
            && self.profile_photo_url.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub cohort: Option<String>,
    pub program_track: Option<String>,
    /// Case-insensitive match against name, email and bio.
    pub search: Option<String>,
    pub limit: i64,
    pub skip: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MembershipTier {
    #[default]
    Free,
    ActiveMonthly,
    ActiveYearly,
    Lifetime,
}

impl MembershipTier {
    pub const ALL: [MembershipTier; 4] = [
        MembershipTier::Free,
        MembershipTier::ActiveMonthly,
        MembershipTier::ActiveYearly,
        MembershipTier::Lifetime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipTier::Free => "free",
            MembershipTier::ActiveMonthly => "active_monthly",
            MembershipTier::ActiveYearly => "active_yearly",
            MembershipTier::Lifetime => "lifetime",
        }
    }

    /// Tier price in cents.
    pub fn price_cents(&self) -> i64 {
        match self {
            MembershipTier::Free => 0,
            MembershipTier::ActiveMonthly => 1_000,
            MembershipTier::ActiveYearly => 12_000,
            MembershipTier::Lifetime => 120_000,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MembershipTier::Free => "Free Membership",
            MembershipTier::ActiveMonthly => "Active Membership (Monthly)",
            MembershipTier::ActiveYearly => "Active Membership (Yearly)",
            MembershipTier::Lifetime => "Lifetime Membership",
        }
    }

    pub fn is_paid(&self) -> bool {
        self.price_cents() > 0
    }
}

impl fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MembershipTier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| format!("unknown membership tier '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberPaymentStatus {
    #[default]
    Pending,
    Active,
    Expired,
}

impl MemberPaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberPaymentStatus::Pending => "pending",
            MemberPaymentStatus::Active => "active",
            MemberPaymentStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for MemberPaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
