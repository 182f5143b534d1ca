//! Event catalog and registration endpoints

use std::sync::Arc;

use alumni_database::{Event, EventRegistration, RegistrationStatus};
use alumni_events::{
    Availability, CreateEventRequest, EventListQuery, RegisterRequest, RegistrationReceipt,
};
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ErrorResponse, GatewayResult};
use crate::rest::health::MessageResponse;
use crate::state::GatewayState;

/// An event with its seat availability.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    #[serde(flatten)]
    pub event: Event,
    pub availability: Availability,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            availability: Availability::of(&event),
            event,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CancellationResponse {
    pub message: String,
    pub cancelled: EventRegistration,
    pub promoted: Option<EventRegistration>,
    pub current_registrations: i64,
    pub waitlist_count: i64,
}

/// One of a member's registrations, listed with its event.
#[derive(Debug, Serialize)]
pub struct UserEventResponse {
    #[serde(flatten)]
    pub event: Event,
    pub registration_id: String,
    pub registration_status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
}

pub fn create_event_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/:event_id", get(get_event).delete(delete_event))
        .route("/api/events/:event_id/register", post(register_for_event))
        .route("/api/events/:event_id/registrations", get(list_registrations))
        .route(
            "/api/events/:event_id/registrations/:registration_id",
            delete(cancel_registration),
        )
        .route("/api/users/:user_id/events", get(list_user_events))
}

#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    params(
        ("limit" = Option<i64>, Query, description = "Page size, default 50"),
        ("skip" = Option<i64>, Query, description = "Events to skip"),
        ("upcoming" = Option<bool>, Query, description = "Only events that have not started")
    ),
    responses(
        (status = 200, description = "Active events ordered by date")
    )
)]
pub async fn list_events(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<EventListQuery>,
) -> GatewayResult<Json<Vec<EventResponse>>> {
    let events = state.event_service.list_events(&query).await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    responses(
        (status = 200, description = "Event created"),
        (status = 400, description = "Invalid event", body = ErrorResponse)
    )
)]
pub async fn create_event(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<CreateEventRequest>,
) -> GatewayResult<Json<EventResponse>> {
    let event = state.event_service.create_event(payload).await?;
    Ok(Json(event.into()))
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}",
    tag = "Events",
    params(("event_id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event details"),
        (status = 404, description = "Event not found", body = ErrorResponse)
    )
)]
pub async fn get_event(
    State(state): State<Arc<GatewayState>>,
    Path(event_id): Path<String>,
) -> GatewayResult<Json<EventResponse>> {
    let event = state.event_service.get_event(&event_id).await?;
    Ok(Json(event.into()))
}

#[utoipa::path(
    delete,
    path = "/api/events/{event_id}",
    tag = "Events",
    params(("event_id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event deactivated", body = MessageResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    )
)]
pub async fn delete_event(
    State(state): State<Arc<GatewayState>>,
    Path(event_id): Path<String>,
) -> GatewayResult<Json<MessageResponse>> {
    state.event_service.delete_event(&event_id).await?;
    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/register",
    tag = "Events",
    params(("event_id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Registered, or added to the waitlist when full"),
        (status = 400, description = "Invalid registrant or event closed", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 409, description = "Already registered", body = ErrorResponse)
    )
)]
pub async fn register_for_event(
    State(state): State<Arc<GatewayState>>,
    Path(event_id): Path<String>,
    Json(payload): Json<RegisterRequest>,
) -> GatewayResult<Json<RegistrationReceipt>> {
    let receipt = state.event_service.register(&event_id, payload).await?;
    Ok(Json(receipt))
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/registrations",
    tag = "Events",
    params(("event_id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Registrations in arrival order"),
        (status = 404, description = "Event not found", body = ErrorResponse)
    )
)]
pub async fn list_registrations(
    State(state): State<Arc<GatewayState>>,
    Path(event_id): Path<String>,
) -> GatewayResult<Json<Vec<EventRegistration>>> {
    let registrations = state.event_service.list_registrations(&event_id).await?;
    Ok(Json(registrations))
}

#[utoipa::path(
    delete,
    path = "/api/events/{event_id}/registrations/{registration_id}",
    tag = "Events",
    params(
        ("event_id" = String, Path, description = "Event id"),
        ("registration_id" = String, Path, description = "Registration id")
    ),
    responses(
        (status = 200, description = "Registration cancelled; the oldest waitlisted registrant may be promoted"),
        (status = 400, description = "Already cancelled", body = ErrorResponse),
        (status = 404, description = "Registration not found", body = ErrorResponse)
    )
)]
pub async fn cancel_registration(
    State(state): State<Arc<GatewayState>>,
    Path((event_id, registration_id)): Path<(String, String)>,
) -> GatewayResult<Json<CancellationResponse>> {
    let outcome = state
        .event_service
        .cancel_registration(&event_id, &registration_id)
        .await?;

    Ok(Json(CancellationResponse {
        message: "Registration cancelled".to_string(),
        current_registrations: outcome.event.current_registrations,
        waitlist_count: outcome.event.waitlist_count,
        cancelled: outcome.cancelled,
        promoted: outcome.promoted,
    }))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/events",
    tag = "Events",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Events the user holds a live registration for"),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn list_user_events(
    State(state): State<Arc<GatewayState>>,
    Path(user_id): Path<String>,
) -> GatewayResult<Json<Vec<UserEventResponse>>> {
    let user = state.user_service.get_user(&user_id).await?;
    let registrations = state
        .event_service
        .registrations_for_email(&user.email)
        .await?;

    Ok(Json(
        registrations
            .into_iter()
            .map(|(registration, event)| UserEventResponse {
                event,
                registration_id: registration.id,
                registration_status: registration.registration_status,
                registered_at: registration.registered_at,
            })
            .collect(),
    ))
}
