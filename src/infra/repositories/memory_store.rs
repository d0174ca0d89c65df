//! In-process store behind every repository port, selected with `DATABASE_URL=memory://`.
//!
//! All four tables sit behind a single lock, so each port call is atomic the
//! same way a single SQL statement is.

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::models::{
    booking::{Booking, BookingStatus, BookingWithEvent, BookingWithUser, OrganizerBookingView},
    contact::ContactMessage,
    event::{Event, EventSummary, EventWithOrganizer},
    user::{User, UserSummary},
};
use crate::domain::ports::{BookingRepository, ContactRepository, EventRepository, UserRepository};
use crate::error::AppError;

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    events: HashMap<String, Event>,
    bookings: HashMap<String, Booking>,
    contacts: Vec<ContactMessage>,
}

impl Tables {
    fn organizer_view(&self, event: &Event) -> Option<EventWithOrganizer> {
        self.users.get(&event.organizer_id).map(|organizer| EventWithOrganizer {
            event: event.clone(),
            organizer: UserSummary::from(organizer),
        })
    }

    fn bookings_newest_first<F>(&self, keep: F) -> Vec<&Booking>
    where
        F: Fn(&Booking) -> bool,
    {
        let mut rows: Vec<&Booking> = self.bookings.values().filter(|b| keep(*b)).collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites `bookings_count` without touching bookings. Used to simulate drift.
    pub async fn force_bookings_count(&self, event_id: &str, count: i32) {
        if let Some(event) = self.tables.write().await.events.get_mut(event_id) {
            event.bookings_count = count;
        }
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        tables.users.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.trim().to_lowercase();
        Ok(self.tables.read().await.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        self.tables.write().await.events.insert(event.id.clone(), event.clone());
        Ok(event.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        Ok(self.tables.read().await.events.get(id).cloned())
    }

    async fn find_with_organizer(&self, id: &str) -> Result<Option<EventWithOrganizer>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.events.get(id).and_then(|e| tables.organizer_view(e)))
    }

    async fn list_active(&self) -> Result<Vec<EventWithOrganizer>, AppError> {
        let tables = self.tables.read().await;
        let mut events: Vec<EventWithOrganizer> = tables.events.values()
            .filter(|e| e.is_active)
            .filter_map(|e| tables.organizer_view(e))
            .collect();
        events.sort_by(|a, b| a.event.date.cmp(&b.event.date));
        Ok(events)
    }

    async fn list_ids(&self) -> Result<Vec<String>, AppError> {
        let tables = self.tables.read().await;
        let mut events: Vec<&Event> = tables.events.values().collect();
        events.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(events.into_iter().map(|e| e.id.clone()).collect())
    }

    async fn update(&self, event: &Event) -> Result<Option<Event>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.events.get_mut(&event.id) else {
            return Ok(None);
        };
        if stored.bookings_count > event.capacity {
            return Ok(None);
        }

        stored.title = event.title.clone();
        stored.description = event.description.clone();
        stored.date = event.date;
        stored.location = event.location.clone();
        stored.image = event.image.clone();
        stored.capacity = event.capacity;
        stored.status = event.status;
        stored.updated_at = event.updated_at;
        Ok(Some(stored.clone()))
    }

    async fn deactivate(&self, id: &str) -> Result<Event, AppError> {
        let mut tables = self.tables.write().await;
        let event = tables.events.get_mut(id).ok_or(AppError::NotFound("Event not found".into()))?;
        event.is_active = false;
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    async fn try_increment_bookings(&self, id: &str) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        match tables.events.get_mut(id) {
            Some(event) if event.is_active && event.bookings_count < event.capacity => {
                event.bookings_count += 1;
                event.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn decrement_bookings(&self, id: &str) -> Result<Option<i32>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.events.get_mut(id).map(|event| {
            event.bookings_count = (event.bookings_count - 1).max(0);
            event.updated_at = Utc::now();
            event.bookings_count
        }))
    }

    async fn recount_bookings(&self, id: &str) -> Result<Option<i32>, AppError> {
        let mut tables = self.tables.write().await;
        let confirmed = tables.bookings.values()
            .filter(|b| b.event_id == id && b.is_confirmed())
            .count() as i32;
        Ok(tables.events.get_mut(id).map(|event| {
            event.bookings_count = confirmed;
            event.updated_at = Utc::now();
            confirmed
        }))
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tables = self.tables.write().await;
        if tables.bookings.values().any(|b| b.user_id == booking.user_id && b.event_id == booking.event_id) {
            return Err(AppError::Conflict("You already have a booking for this event.".into()));
        }
        tables.bookings.insert(booking.id.clone(), booking.clone());
        Ok(booking.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        Ok(self.tables.read().await.bookings.get(id).cloned())
    }

    async fn find_by_user_and_event(&self, user_id: &str, event_id: &str) -> Result<Option<Booking>, AppError> {
        Ok(self.tables.read().await.bookings.values()
            .find(|b| b.user_id == user_id && b.event_id == event_id)
            .cloned())
    }

    async fn find_for_user(&self, id: &str, user_id: &str) -> Result<Option<Booking>, AppError> {
        Ok(self.tables.read().await.bookings.get(id)
            .filter(|b| b.user_id == user_id)
            .cloned())
    }

    async fn transition_status(&self, id: &str, from: BookingStatus, to: BookingStatus) -> Result<Option<Booking>, AppError> {
        let mut tables = self.tables.write().await;
        match tables.bookings.get_mut(id) {
            Some(booking) if booking.status == from => {
                booking.status = to;
                booking.updated_at = Utc::now();
                Ok(Some(booking.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn count_confirmed(&self, event_id: &str) -> Result<i64, AppError> {
        Ok(self.tables.read().await.bookings.values()
            .filter(|b| b.event_id == event_id && b.is_confirmed())
            .count() as i64)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<BookingWithEvent>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.bookings_newest_first(|b| b.user_id == user_id)
            .into_iter()
            .filter_map(|b| tables.events.get(&b.event_id).map(|e| BookingWithEvent {
                booking: b.clone(),
                event: EventSummary::from(e),
            }))
            .collect())
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<BookingWithUser>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.bookings_newest_first(|b| b.event_id == event_id)
            .into_iter()
            .filter_map(|b| tables.users.get(&b.user_id).map(|u| BookingWithUser {
                booking: b.clone(),
                user: UserSummary::from(u),
            }))
            .collect())
    }

    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<OrganizerBookingView>, AppError> {
        let tables = self.tables.read().await;
        let owned = |b: &Booking| tables.events.get(&b.event_id).is_some_and(|e| e.organizer_id == organizer_id);
        Ok(tables.bookings_newest_first(owned)
            .into_iter()
            .filter_map(|b| {
                let event = tables.events.get(&b.event_id)?;
                let user = tables.users.get(&b.user_id)?;
                Some(OrganizerBookingView {
                    booking: b.clone(),
                    event: EventSummary::from(event),
                    user: UserSummary::from(user),
                })
            })
            .collect())
    }
}

#[async_trait]
impl ContactRepository for MemoryStore {
    async fn create(&self, message: &ContactMessage) -> Result<ContactMessage, AppError> {
        self.tables.write().await.contacts.push(message.clone());
        Ok(message.clone())
    }

    async fn list(&self) -> Result<Vec<ContactMessage>, AppError> {
        let mut messages = self.tables.read().await.contacts.clone();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages)
    }
}
