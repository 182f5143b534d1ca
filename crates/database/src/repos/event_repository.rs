//! Event repository: catalog rows plus the admission-controlled registration ledger.

use crate::entities::event::{
    CancellationOutcome, Event, EventRegistration, NewEvent, NewRegistration,
    RegistrationOutcome, RegistrationStatus,
};
use crate::types::{DatabaseError, DatabaseResult};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::info;

const EVENT_COLUMNS: &str = "id, title, description, event_type, date, location, capacity, \
     current_registrations, waitlist_count, created_by, created_at, is_active";

const REGISTRATION_COLUMNS: &str = "id, event_id, member_id, member_name, member_email, \
     registration_status, registered_at, notes, cancelled_at, promoted_at";

/// Repository for events and their registrations
#[derive(Clone)]
pub struct EventRepository {
    pool: SqlitePool,
}

impl EventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_event: &NewEvent) -> DatabaseResult<Event> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO events (id, title, description, event_type, date, location, capacity, \
             current_registrations, waitlist_count, created_by, created_at, is_active) \
             VALUES (?, ?, ?, ?, ?, ?, ?, 0, 0, ?, ?, 1)",
        )
        .bind(&id)
        .bind(&new_event.title)
        .bind(&new_event.description)
        .bind(new_event.event_type)
        .bind(new_event.date)
        .bind(&new_event.location)
        .bind(new_event.capacity)
        .bind(&new_event.created_by)
        .bind(now)
        .execute(&self.pool)
        .await?;

        info!(event_id = %id, title = %new_event.title, capacity = ?new_event.capacity, "event created");

        self.find_by_id(&id).await?.ok_or_else(|| DatabaseError::not_found("event", &id))
    }

    /// Active events only.
    pub async fn find_by_id(&self, id: &str) -> DatabaseResult<Option<Event>> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ? AND is_active = 1");
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    /// Active events ordered by date. `starting_after` restricts to events later than the instant.
    pub async fn list(
        &self,
        starting_after: Option<DateTime<Utc>>,
        limit: i64,
        skip: i64,
    ) -> DatabaseResult<Vec<Event>> {
        let events = match starting_after {
            Some(after) => {
                let query = format!(
                    "SELECT {EVENT_COLUMNS} FROM events WHERE is_active = 1 AND date > ? \
                     ORDER BY date ASC LIMIT ? OFFSET ?"
                );
                sqlx::query_as::<_, Event>(&query)
                    .bind(after)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!(
                    "SELECT {EVENT_COLUMNS} FROM events WHERE is_active = 1 \
                     ORDER BY date ASC LIMIT ? OFFSET ?"
                );
                sqlx::query_as::<_, Event>(&query)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(events)
    }

    /// Soft delete. Returns `false` when no active event matched.
    pub async fn deactivate(&self, id: &str) -> DatabaseResult<bool> {
        let result = sqlx::query("UPDATE events SET is_active = 0 WHERE id = ? AND is_active = 1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Admit a registrant: a seat when one is free, the waitlist otherwise.
    ///
    /// The seat check and increment is a single conditional `UPDATE`, issued as the
    /// first statement of the transaction so the write lock is taken up front. The
    /// registration insert runs in the same transaction; a duplicate live
    /// registration surfaces as [`DatabaseError::Duplicate`] and the counter change
    /// is rolled back.
    pub async fn register(
        &self,
        event_id: &str,
        registration: &NewRegistration,
    ) -> DatabaseResult<RegistrationOutcome> {
        let mut tx = self.pool.begin().await?;

        let seated = sqlx::query(
            "UPDATE events SET current_registrations = current_registrations + 1 \
             WHERE id = ? AND is_active = 1 \
             AND (capacity IS NULL OR current_registrations < capacity)",
        )
        .bind(event_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            == 1;

        let status = if seated {
            RegistrationStatus::Registered
        } else {
            let queued = sqlx::query(
                "UPDATE events SET waitlist_count = waitlist_count + 1 \
                 WHERE id = ? AND is_active = 1",
            )
            .bind(event_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if queued == 0 {
                return Err(DatabaseError::not_found("event", event_id));
            }
            RegistrationStatus::Waitlisted
        };

        let id = uuid::Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO event_registrations (id, event_id, member_id, member_name, member_email, \
             registration_status, registered_at, notes) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(event_id)
        .bind(&registration.member_id)
        .bind(&registration.member_name)
        .bind(&registration.member_email)
        .bind(status)
        .bind(Utc::now())
        .bind(&registration.notes)
        .execute(&mut *tx)
        .await?;

        let registration = fetch_registration(&mut tx, &id).await?;
        let event = fetch_event(&mut tx, event_id).await?;
        tx.commit().await?;

        info!(
            event_id = %event_id,
            registration_id = %id,
            status = %status,
            current_registrations = event.current_registrations,
            waitlist_count = event.waitlist_count,
            "registration admitted"
        );

        Ok(RegistrationOutcome { registration, event })
    }

    /// Cancel a live registration. A freed seat goes to the oldest waitlisted entry.
    pub async fn cancel(
        &self,
        event_id: &str,
        registration_id: &str,
    ) -> DatabaseResult<CancellationOutcome> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let query = format!(
            "SELECT {REGISTRATION_COLUMNS} FROM event_registrations WHERE id = ? AND event_id = ?"
        );
        let existing = sqlx::query_as::<_, EventRegistration>(&query)
            .bind(registration_id)
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::not_found("registration", registration_id))?;

        if !existing.registration_status.is_live() {
            return Err(DatabaseError::Conflict(format!(
                "registration {registration_id} is already cancelled"
            )));
        }

        let updated = sqlx::query(
            "UPDATE event_registrations SET registration_status = 'cancelled', cancelled_at = ? \
             WHERE id = ? AND registration_status = ?",
        )
        .bind(now)
        .bind(registration_id)
        .bind(existing.registration_status)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() != 1 {
            return Err(DatabaseError::Conflict(format!(
                "registration {registration_id} changed concurrently"
            )));
        }

        let mut promoted_id = None;
        match existing.registration_status {
            RegistrationStatus::Registered => {
                let next: Option<(String,)> = sqlx::query_as(
                    "SELECT id FROM event_registrations \
                     WHERE event_id = ? AND registration_status = 'waitlisted' \
                     ORDER BY registered_at ASC, rowid ASC LIMIT 1",
                )
                .bind(event_id)
                .fetch_optional(&mut *tx)
                .await?;

                if let Some((next_id,)) = next {
                    // The seat changes hands, so current_registrations stays put.
                    sqlx::query(
                        "UPDATE event_registrations SET registration_status = 'registered', \
                         promoted_at = ? WHERE id = ?",
                    )
                    .bind(now)
                    .bind(&next_id)
                    .execute(&mut *tx)
                    .await?;
                    sqlx::query("UPDATE events SET waitlist_count = waitlist_count - 1 WHERE id = ?")
                        .bind(event_id)
                        .execute(&mut *tx)
                        .await?;
                    promoted_id = Some(next_id);
                } else {
                    sqlx::query(
                        "UPDATE events SET current_registrations = current_registrations - 1 \
                         WHERE id = ?",
                    )
                    .bind(event_id)
                    .execute(&mut *tx)
                    .await?;
                }
            }
            RegistrationStatus::Waitlisted => {
                sqlx::query("UPDATE events SET waitlist_count = waitlist_count - 1 WHERE id = ?")
                    .bind(event_id)
                    .execute(&mut *tx)
                    .await?;
            }
            RegistrationStatus::Cancelled => {}
        }

        let cancelled = fetch_registration(&mut tx, registration_id).await?;
        let promoted = match promoted_id {
            Some(id) => Some(fetch_registration(&mut tx, &id).await?),
            None => None,
        };
        let event = fetch_event_any(&mut tx, event_id).await?;
        tx.commit().await?;

        info!(
            event_id = %event_id,
            registration_id = %registration_id,
            promoted = ?promoted.as_ref().map(|r| r.id.as_str()),
            "registration cancelled"
        );

        Ok(CancellationOutcome {
            cancelled,
            promoted,
            event,
        })
    }

    /// All registrations for an event in admission order.
    pub async fn list_registrations(&self, event_id: &str) -> DatabaseResult<Vec<EventRegistration>> {
        let query = format!(
            "SELECT {REGISTRATION_COLUMNS} FROM event_registrations WHERE event_id = ? \
             ORDER BY registered_at ASC, rowid ASC"
        );
        let registrations = sqlx::query_as::<_, EventRegistration>(&query)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(registrations)
    }

    /// Live registrations held by an email, each paired with its (active) event.
    pub async fn list_for_email(
        &self,
        email: &str,
    ) -> DatabaseResult<Vec<(EventRegistration, Event)>> {
        let rows = sqlx::query(
            "SELECT r.id AS r_id, r.event_id AS r_event_id, r.member_id AS r_member_id, \
             r.member_name AS r_member_name, r.member_email AS r_member_email, \
             r.registration_status AS r_registration_status, r.registered_at AS r_registered_at, \
             r.notes AS r_notes, r.cancelled_at AS r_cancelled_at, r.promoted_at AS r_promoted_at, \
             e.id, e.title, e.description, e.event_type, e.date, e.location, e.capacity, \
             e.current_registrations, e.waitlist_count, e.created_by, e.created_at, e.is_active \
             FROM event_registrations r JOIN events e ON e.id = r.event_id \
             WHERE r.member_email = ? AND r.registration_status != 'cancelled' AND e.is_active = 1 \
             ORDER BY e.date ASC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let registration = registration_from_prefixed(row)?;
                let event = <Event as sqlx::FromRow<SqliteRow>>::from_row(row)?;
                Ok((registration, event))
            })
            .collect()
    }
}

fn registration_from_prefixed(row: &SqliteRow) -> Result<EventRegistration, sqlx::Error> {
    Ok(EventRegistration {
        id: row.try_get("r_id")?,
        event_id: row.try_get("r_event_id")?,
        member_id: row.try_get("r_member_id")?,
        member_name: row.try_get("r_member_name")?,
        member_email: row.try_get("r_member_email")?,
        registration_status: row.try_get("r_registration_status")?,
        registered_at: row.try_get("r_registered_at")?,
        notes: row.try_get("r_notes")?,
        cancelled_at: row.try_get("r_cancelled_at")?,
        promoted_at: row.try_get("r_promoted_at")?,
    })
}

async fn fetch_registration(
    tx: &mut Transaction<'_, Sqlite>,
    id: &str,
) -> DatabaseResult<EventRegistration> {
    let query = format!("SELECT {REGISTRATION_COLUMNS} FROM event_registrations WHERE id = ?");
    let registration = sqlx::query_as::<_, EventRegistration>(&query)
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;
    Ok(registration)
}

async fn fetch_event(tx: &mut Transaction<'_, Sqlite>, id: &str) -> DatabaseResult<Event> {
    let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ? AND is_active = 1");
    let event = sqlx::query_as::<_, Event>(&query)
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;
    Ok(event)
}

async fn fetch_event_any(tx: &mut Transaction<'_, Sqlite>, id: &str) -> DatabaseResult<Event> {
    let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?");
    let event = sqlx::query_as::<_, Event>(&query)
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;
    Ok(event)
}
