use std::sync::Arc;
use crate::domain::models::booking::{BookingWithEvent, BookingWithUser, OrganizerBookingView};
use crate::domain::ports::{BookingRepository, EventRepository};
use crate::error::AppError;

/// Read-only projections over bookings. Each query spells out its own join.
pub struct BookingQueries {
    event_repo: Arc<dyn EventRepository>,
    booking_repo: Arc<dyn BookingRepository>,
}

impl BookingQueries {
    pub fn new(event_repo: Arc<dyn EventRepository>, booking_repo: Arc<dyn BookingRepository>) -> Self {
        Self { event_repo, booking_repo }
    }

    pub async fn my_bookings(&self, user_id: &str) -> Result<Vec<BookingWithEvent>, AppError> {
        self.booking_repo.list_by_user(user_id).await
    }

    pub async fn event_bookings(&self, organizer_id: &str, event_id: &str) -> Result<Vec<BookingWithUser>, AppError> {
        let event = self.event_repo.find_by_id(event_id).await?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        if !event.is_owned_by(organizer_id) {
            return Err(AppError::Forbidden("Not authorized to view bookings for this event".into()));
        }

        self.booking_repo.list_by_event(&event.id).await
    }

    pub async fn organizer_bookings(&self, organizer_id: &str) -> Result<Vec<OrganizerBookingView>, AppError> {
        self.booking_repo.list_by_organizer(organizer_id).await
    }
}
