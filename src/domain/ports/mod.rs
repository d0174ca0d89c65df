use crate::domain::models::{
    booking::{Booking, BookingStatus, BookingWithEvent, BookingWithUser, OrganizerBookingView},
    contact::ContactMessage,
    event::{Event, EventWithOrganizer},
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn find_with_organizer(&self, id: &str) -> Result<Option<EventWithOrganizer>, AppError>;
    async fn list_active(&self) -> Result<Vec<EventWithOrganizer>, AppError>;
    async fn list_ids(&self) -> Result<Vec<String>, AppError>;

    /// Writes the organizer-editable fields. Never touches `bookings_count`.
    /// Returns `None` when the new capacity would fall below the current
    /// `bookings_count` at the instant of the write.
    async fn update(&self, event: &Event) -> Result<Option<Event>, AppError>;
    async fn deactivate(&self, id: &str) -> Result<Event, AppError>;

    /// Single atomic step: `bookings_count += 1` only while the event is active
    /// and `bookings_count < capacity`. Returns whether the row was updated.
    async fn try_increment_bookings(&self, id: &str) -> Result<bool, AppError>;
    /// `bookings_count -= 1`, floored at 0. Returns the new count, or `None`
    /// when the event does not exist.
    async fn decrement_bookings(&self, id: &str) -> Result<Option<i32>, AppError>;
    /// Replaces `bookings_count` with the number of confirmed bookings in one
    /// statement. Returns the new count, or `None` when the event does not exist.
    async fn recount_bookings(&self, id: &str) -> Result<Option<i32>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Fails with `Conflict` when a row for the same (user, event) pair exists.
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn find_by_user_and_event(&self, user_id: &str, event_id: &str) -> Result<Option<Booking>, AppError>;
    async fn find_for_user(&self, id: &str, user_id: &str) -> Result<Option<Booking>, AppError>;

    /// Compare-and-set on `status`. Returns `None` when the row was not in `from`.
    async fn transition_status(&self, id: &str, from: BookingStatus, to: BookingStatus) -> Result<Option<Booking>, AppError>;
    async fn count_confirmed(&self, event_id: &str) -> Result<i64, AppError>;

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<BookingWithEvent>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<BookingWithUser>, AppError>;
    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<OrganizerBookingView>, AppError>;
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(&self, message: &ContactMessage) -> Result<ContactMessage, AppError>;
    async fn list(&self) -> Result<Vec<ContactMessage>, AppError>;
}
