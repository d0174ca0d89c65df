use axum::{extract::{rejection::JsonRejection, Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::{CreateEventRequest, UpdateEventRequest}, responses::EventResponse};
use crate::api::extractors::auth::OrganizerUser;
use crate::domain::models::event::{Event, EventWithOrganizer, NewEventParams};
use crate::domain::models::user::{User, UserSummary};
use crate::domain::services::event_rules::{apply_changes, capacity_below_bookings, validate_new_event, EventChanges};
use std::sync::Arc;
use chrono::Utc;
use tracing::info;

fn with_organizer(event: Event, organizer: &User) -> EventWithOrganizer {
    EventWithOrganizer {
        event,
        organizer: UserSummary::from(organizer),
    }
}

/// Loads an event only if `organizer` owns it; anything else reads as missing.
async fn owned_event(state: &AppState, organizer: &User, id: &str) -> Result<Event, AppError> {
    state.event_repo.find_by_id(id).await?
        .filter(|e| e.is_owned_by(&organizer.id))
        .ok_or(AppError::NotFound("Event not found or not authorized".into()))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    OrganizerUser(user): OrganizerUser,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let (Some(title), Some(description), Some(date), Some(location)) =
        (payload.title, payload.description, payload.date, payload.location)
    else {
        return Err(AppError::Validation("All required fields must be provided".into()));
    };

    let params = NewEventParams {
        title,
        description,
        date,
        location,
        image: payload.image.filter(|i| !i.trim().is_empty()),
        capacity: payload.capacity,
        organizer_id: user.id.clone(),
    };
    validate_new_event(&params, Utc::now())?;

    let event = state.event_repo.create(&Event::new(params)).await?;

    info!(event_id = %event.id, capacity = event.capacity, "Event created");

    Ok((StatusCode::CREATED, Json(EventResponse {
        message: "Event created successfully".into(),
        event: with_organizer(event, &user),
    })))
}

pub async fn list_events(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let events: Vec<EventWithOrganizer> = state.event_repo.list_active().await?
        .into_iter()
        .map(|e| e.refresh_status(now))
        .collect();

    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_with_organizer(&id).await?
        .filter(|e| e.event.is_active)
        .ok_or(AppError::NotFound("Event not found".into()))?;

    Ok(Json(event.refresh_status(Utc::now())))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    OrganizerUser(user): OrganizerUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let event = owned_event(&state, &user, &id).await?;

    let changes = EventChanges {
        title: payload.title,
        description: payload.description,
        date: payload.date,
        location: payload.location,
        image: payload.image,
        capacity: payload.capacity,
    };
    let updated = apply_changes(&event, changes, Utc::now())?;

    // The store re-checks capacity against the live counter; a booking may have
    // landed since `event` was read.
    let Some(saved) = state.event_repo.update(&updated).await? else {
        let current = state.event_repo.find_by_id(&id).await?
            .ok_or(AppError::NotFound("Event not found".into()))?;
        return Err(capacity_below_bookings(current.bookings_count));
    };

    info!(event_id = %saved.id, capacity = saved.capacity, "Event updated");

    Ok(Json(EventResponse {
        message: "Event updated successfully".into(),
        event: with_organizer(saved, &user),
    }))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    OrganizerUser(user): OrganizerUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = owned_event(&state, &user, &id).await?;
    let event = state.event_repo.deactivate(&event.id).await?;

    info!(event_id = %event.id, "Event deactivated");

    Ok(Json(EventResponse {
        message: "Event deactivated (soft deleted)".into(),
        event: with_organizer(event, &user),
    }))
}

/// Read-only comparison of the cached seat counter with the booking rows.
pub async fn audit_event(
    State(state): State<Arc<AppState>>,
    OrganizerUser(user): OrganizerUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = owned_event(&state, &user, &id).await?;
    let audit = state.booking_service.ledger().audit(&event.id).await?;

    Ok(Json(audit))
}
