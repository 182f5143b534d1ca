//! Event service: catalog management and admission control.

use alumni_database::{
    non_blank, normalize_email, CancellationOutcome, DatabaseError, Event, EventRegistration,
    EventRepository, NewEvent, NewRegistration,
};
use chrono::Utc;
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::types::{
    CreateEventRequest, EventError, EventListQuery, EventResult, RegisterRequest,
    RegistrationReceipt,
};

const DEFAULT_CREATED_BY: &str = "ICAA Admin";

pub struct EventService {
    repository: EventRepository,
    /// Serialises admission and cancellation within this process so SQLite never
    /// sees two writers racing to upgrade their locks on the same counters.
    admission: Mutex<()>,
}

impl EventService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: EventRepository::new(pool),
            admission: Mutex::new(()),
        }
    }

    pub async fn create_event(&self, request: CreateEventRequest) -> EventResult<Event> {
        let title = non_blank(&request.title)
            .ok_or_else(|| EventError::validation("title must not be empty"))?;
        let location = non_blank(&request.location)
            .ok_or_else(|| EventError::validation("location must not be empty"))?;
        if matches!(request.capacity, Some(capacity) if capacity < 1) {
            return Err(EventError::validation("capacity must be at least 1 when set"));
        }

        let created_by = request
            .created_by
            .as_deref()
            .and_then(non_blank)
            .unwrap_or_else(|| DEFAULT_CREATED_BY.to_string());

        let event = self
            .repository
            .create(&NewEvent {
                title,
                description: request.description.trim().to_string(),
                event_type: request.event_type,
                date: request.date,
                location,
                capacity: request.capacity,
                created_by,
            })
            .await?;
        Ok(event)
    }

    pub async fn list_events(&self, query: &EventListQuery) -> EventResult<Vec<Event>> {
        let starting_after = query.upcoming.then(Utc::now);
        let events = self
            .repository
            .list(starting_after, query.limit(), query.skip())
            .await?;
        Ok(events)
    }

    pub async fn get_event(&self, id: &str) -> EventResult<Event> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| EventError::EventNotFound { id: id.to_string() })
    }

    pub async fn delete_event(&self, id: &str) -> EventResult<()> {
        if !self.repository.deactivate(id).await? {
            return Err(EventError::EventNotFound { id: id.to_string() });
        }
        info!(event_id = %id, "event deactivated");
        Ok(())
    }

    /// Register for an event: a seat while capacity remains, the waitlist otherwise.
    pub async fn register(
        &self,
        event_id: &str,
        request: RegisterRequest,
    ) -> EventResult<RegistrationReceipt> {
        let member_name = non_blank(&request.member_name)
            .ok_or_else(|| EventError::validation("member_name must not be empty"))?;
        let member_email = normalize_email(&request.member_email)
            .ok_or_else(|| EventError::validation("member_email must be a valid email address"))?;

        let event = self.get_event(event_id).await?;
        if event.has_passed(Utc::now()) {
            return Err(EventError::closed("event has already taken place"));
        }

        let registration = NewRegistration {
            member_id: request
                .member_id
                .as_deref()
                .and_then(non_blank)
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            member_name,
            member_email,
            notes: request.notes.as_deref().and_then(non_blank),
        };

        let outcome = {
            let _guard = self.admission.lock().await;
            self.repository.register(event_id, &registration).await
        };

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(DatabaseError::NotFound(_)) => {
                return Err(EventError::EventNotFound {
                    id: event_id.to_string(),
                })
            }
            Err(err) => {
                if err.is_duplicate() {
                    warn!(event_id = %event_id, email = %registration.member_email, "duplicate registration rejected");
                }
                return Err(err.into());
            }
        };

        Ok(RegistrationReceipt::new(
            outcome.registration.id,
            outcome.registration.registration_status,
            &outcome.event,
        ))
    }

    /// Cancel a registration, promoting the oldest waitlisted registrant into a freed seat.
    pub async fn cancel_registration(
        &self,
        event_id: &str,
        registration_id: &str,
    ) -> EventResult<CancellationOutcome> {
        let outcome = {
            let _guard = self.admission.lock().await;
            self.repository.cancel(event_id, registration_id).await
        };

        outcome.map_err(|err| match err {
            DatabaseError::NotFound(_) => EventError::RegistrationNotFound {
                id: registration_id.to_string(),
            },
            DatabaseError::Conflict(_) => EventError::AlreadyCancelled,
            other => other.into(),
        })
    }

    pub async fn list_registrations(&self, event_id: &str) -> EventResult<Vec<EventRegistration>> {
        self.get_event(event_id).await?;
        Ok(self.repository.list_registrations(event_id).await?)
    }

    /// Live registrations held by an email address, with their events.
    pub async fn registrations_for_email(
        &self,
        email: &str,
    ) -> EventResult<Vec<(EventRegistration, Event)>> {
        let email = normalize_email(email)
            .ok_or_else(|| EventError::validation("email must be a valid email address"))?;
        Ok(self.repository.list_for_email(&email).await?)
    }
}
