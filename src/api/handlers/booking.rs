use axum::{extract::{rejection::JsonRejection, Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::CreateBookingRequest, responses::BookingResponse};
use crate::api::extractors::auth::{AuthUser, OrganizerUser};
use std::sync::Arc;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let event_id = payload.event_id.unwrap_or_default();

    let outcome = state.booking_service.book(&user.id, &event_id).await?;

    let (status, message) = if outcome.is_new() {
        (StatusCode::CREATED, "Booking confirmed successfully")
    } else {
        (StatusCode::OK, "Booking re-confirmed")
    };

    Ok((status, Json(BookingResponse {
        message: message.into(),
        booking: outcome.booking,
    })))
}

pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.booking_queries.my_bookings(&user.id).await?))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service.cancel(&user.id, &id).await?;

    Ok(Json(BookingResponse {
        message: "Booking cancelled successfully".into(),
        booking,
    }))
}

pub async fn organizer_bookings(
    State(state): State<Arc<AppState>>,
    OrganizerUser(user): OrganizerUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.booking_queries.organizer_bookings(&user.id).await?))
}

pub async fn event_bookings(
    State(state): State<Arc<AppState>>,
    OrganizerUser(user): OrganizerUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.booking_queries.event_bookings(&user.id, &event_id).await?))
}
