use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use super::{event::EventSummary, user::UserSummary};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(user_id: String, event_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            event_id,
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

/// "My bookings": a booking joined with the event it references.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BookingWithEvent {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub booking: Booking,
    #[sqlx(flatten)]
    pub event: EventSummary,
}

/// Bookings for a single event, joined with the booking user.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BookingWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub booking: Booking,
    #[sqlx(flatten)]
    pub user: UserSummary,
}

/// Bookings across all of an organizer's events.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct OrganizerBookingView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub booking: Booking,
    #[sqlx(flatten)]
    pub event: EventSummary,
    #[sqlx(flatten)]
    pub user: UserSummary,
}
