//! Event and registration entity definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub date: DateTime<Utc>,
    pub location: String,
    /// `None` means unlimited.
    pub capacity: Option<i64>,
    pub current_registrations: i64,
    pub waitlist_count: i64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Event {
    pub fn has_passed(&self, now: DateTime<Utc>) -> bool {
        self.date <= now
    }
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: Option<i64>,
    pub created_by: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Networking,
    ProfessionalDevelopment,
    Social,
    ThirdThursday,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Networking => "networking",
            EventType::ProfessionalDevelopment => "professional_development",
            EventType::Social => "social",
            EventType::ThirdThursday => "third_thursday",
            EventType::Other => "other",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "networking" => Ok(EventType::Networking),
            "professional_development" => Ok(EventType::ProfessionalDevelopment),
            "social" => Ok(EventType::Social),
            "third_thursday" => Ok(EventType::ThirdThursday),
            "other" => Ok(EventType::Other),
            unknown => Err(format!("unknown event type '{unknown}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Registered,
    Waitlisted,
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Registered => "registered",
            RegistrationStatus::Waitlisted => "waitlisted",
            RegistrationStatus::Cancelled => "cancelled",
        }
    }

    /// Registered and waitlisted entries block a second registration by the same email.
    pub fn is_live(&self) -> bool {
        !matches!(self, RegistrationStatus::Cancelled)
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRegistration {
    pub id: String,
    pub event_id: String,
    pub member_id: String,
    pub member_name: String,
    pub member_email: String,
    pub registration_status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub promoted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub member_id: String,
    pub member_name: String,
    /// Stored as given; callers normalise case beforehand.
    pub member_email: String,
    pub notes: Option<String>,
}

/// Result of an admission attempt, with the event counters as committed.
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    pub registration: EventRegistration,
    pub event: Event,
}

#[derive(Debug, Clone)]
pub struct CancellationOutcome {
    pub cancelled: EventRegistration,
    /// The waitlisted registration that took over the freed seat, if any.
    pub promoted: Option<EventRegistration>,
    pub event: Event,
}
