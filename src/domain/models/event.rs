use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use super::user::UserSummary;

pub const DEFAULT_CAPACITY: i32 = 100;
pub const DEFAULT_IMAGE: &str = "/images/default-event.jpg";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Completed,
    Cancelled,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub image: String,
    pub capacity: i32,
    pub bookings_count: i32,
    pub is_active: bool,
    pub status: EventStatus,
    pub organizer_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewEventParams {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub image: Option<String>,
    pub capacity: Option<i32>,
    pub organizer_id: String,
}

impl Event {
    pub fn new(params: NewEventParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: params.title.trim().to_string(),
            description: params.description,
            date: params.date,
            location: params.location.trim().to_string(),
            image: params.image.unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            capacity: params.capacity.unwrap_or(DEFAULT_CAPACITY),
            bookings_count: 0,
            is_active: true,
            status: EventStatus::Upcoming,
            organizer_id: params.organizer_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.date < now
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.organizer_id == user_id
    }

    /// An `upcoming` event whose date has gone by is reported as `completed`.
    pub fn refresh_status(&mut self, now: DateTime<Utc>) {
        if self.status == EventStatus::Upcoming && self.is_past(now) {
            self.status = EventStatus::Completed;
        }
    }
}

/// Event columns projected into booking views, prefixed `event_` in SQL.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    #[sqlx(rename = "event_id")]
    pub id: String,
    #[sqlx(rename = "event_title")]
    pub title: String,
    #[sqlx(rename = "event_date")]
    pub date: DateTime<Utc>,
    #[sqlx(rename = "event_location")]
    pub location: String,
    #[sqlx(rename = "event_capacity")]
    pub capacity: i32,
    #[sqlx(rename = "event_bookings_count")]
    pub bookings_count: i32,
    #[sqlx(rename = "event_organizer_id")]
    pub organizer_id: String,
    #[sqlx(rename = "event_is_active")]
    pub is_active: bool,
    #[sqlx(rename = "event_status")]
    pub status: EventStatus,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            date: event.date,
            location: event.location.clone(),
            capacity: event.capacity,
            bookings_count: event.bookings_count,
            organizer_id: event.organizer_id.clone(),
            is_active: event.is_active,
            status: event.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EventWithOrganizer {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub event: Event,
    #[sqlx(flatten)]
    pub organizer: UserSummary,
}

impl EventWithOrganizer {
    pub fn refresh_status(mut self, now: DateTime<Utc>) -> Self {
        self.event.refresh_status(now);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(date: DateTime<Utc>) -> Event {
        Event::new(NewEventParams {
            title: "Rust Meetup".into(),
            description: "Monthly gathering of crabs".into(),
            date,
            location: "Berlin".into(),
            image: None,
            capacity: Some(2),
            organizer_id: "org-1".into(),
        })
    }

    #[test]
    fn test_defaults_applied() {
        let event = Event::new(NewEventParams {
            title: "  Padded  ".into(),
            description: "Some description".into(),
            date: Utc::now() + Duration::days(1),
            location: "Hall".into(),
            image: None,
            capacity: None,
            organizer_id: "org".into(),
        });
        assert_eq!(event.capacity, DEFAULT_CAPACITY);
        assert_eq!(event.image, DEFAULT_IMAGE);
        assert_eq!(event.title, "Padded");
        assert_eq!(event.bookings_count, 0);
        assert!(event.is_active);
    }

    #[test]
    fn test_refresh_status_marks_past_upcoming_events_completed() {
        let now = Utc::now();
        let mut past = sample(now - Duration::hours(1));
        past.refresh_status(now);
        assert_eq!(past.status, EventStatus::Completed);

        let mut cancelled = sample(now - Duration::hours(1));
        cancelled.status = EventStatus::Cancelled;
        cancelled.refresh_status(now);
        assert_eq!(cancelled.status, EventStatus::Cancelled);

        let mut future = sample(now + Duration::hours(1));
        future.refresh_status(now);
        assert_eq!(future.status, EventStatus::Upcoming);
    }
}
