//! Request and response shapes for the event service.

use alumni_database::{Event, EventType, RegistrationStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::admission::Availability;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: Option<i64>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Present when the registrant is a known member.
    pub member_id: Option<String>,
    pub member_name: String,
    pub member_email: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventListQuery {
    pub limit: Option<i64>,
    pub skip: Option<i64>,
    /// Only events that have not started yet.
    #[serde(default)]
    pub upcoming: bool,
}

impl EventListQuery {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 200;

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0).max(0)
    }
}

/// What a registrant is told after admission.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationReceipt {
    pub message: String,
    pub registration_status: RegistrationStatus,
    pub registration_id: String,
    pub event_id: String,
    pub current_registrations: i64,
    pub waitlist_count: i64,
    pub availability: Availability,
}

impl RegistrationReceipt {
    pub fn new(registration_id: String, status: RegistrationStatus, event: &Event) -> Self {
        let message = match status {
            RegistrationStatus::Waitlisted => "Successfully added to waitlist for event",
            _ => "Successfully registered for event",
        };
        Self {
            message: message.to_string(),
            registration_status: status,
            registration_id,
            event_id: event.id.clone(),
            current_registrations: event.current_registrations,
            waitlist_count: event.waitlist_count,
            availability: Availability::of(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_clamps_paging() {
        let query = EventListQuery {
            limit: Some(10_000),
            skip: Some(-3),
            upcoming: false,
        };
        assert_eq!(query.limit(), EventListQuery::MAX_LIMIT);
        assert_eq!(query.skip(), 0);
        assert_eq!(EventListQuery::default().limit(), EventListQuery::DEFAULT_LIMIT);
    }
}
