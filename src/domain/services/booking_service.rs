use std::sync::Arc;
use crate::domain::models::booking::{Booking, BookingStatus};
use crate::domain::ports::{BookingRepository, EventRepository};
use crate::domain::services::capacity_ledger::CapacityLedger;
use crate::error::AppError;
use chrono::Utc;
use tracing::{error, info, warn};

/// Lifecycle of the single booking row a (user, event) pair may own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    NoBooking,
    Confirmed,
    Cancelled,
}

impl From<Option<&Booking>> for BookingState {
    fn from(row: Option<&Booking>) -> Self {
        match row.map(|b| b.status) {
            None => BookingState::NoBooking,
            Some(BookingStatus::Confirmed) => BookingState::Confirmed,
            Some(BookingStatus::Cancelled) => BookingState::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Book,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Create,
    Reconfirm,
    Cancel,
}

pub fn plan(state: BookingState, action: BookingAction) -> Result<Transition, AppError> {
    match (state, action) {
        (BookingState::NoBooking, BookingAction::Book) => Ok(Transition::Create),
        (BookingState::Cancelled, BookingAction::Book) => Ok(Transition::Reconfirm),
        (BookingState::Confirmed, BookingAction::Book) => Err(already_booked()),
        (BookingState::Confirmed, BookingAction::Cancel) => Ok(Transition::Cancel),
        (BookingState::Cancelled, BookingAction::Cancel) => Err(already_cancelled()),
        (BookingState::NoBooking, BookingAction::Cancel) => Err(AppError::NotFound("Booking not found".into())),
    }
}

fn already_booked() -> AppError {
    AppError::Conflict("You already have a booking for this event.".into())
}

fn already_cancelled() -> AppError {
    AppError::Conflict("Booking already cancelled.".into())
}

#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub booking: Booking,
    pub transition: Transition,
}

impl BookingOutcome {
    pub fn is_new(&self) -> bool {
        self.transition == Transition::Create
    }
}

pub struct BookingService {
    event_repo: Arc<dyn EventRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    ledger: CapacityLedger,
}

impl BookingService {
    pub fn new(event_repo: Arc<dyn EventRepository>, booking_repo: Arc<dyn BookingRepository>) -> Self {
        let ledger = CapacityLedger::new(event_repo.clone(), booking_repo.clone());
        Self { event_repo, booking_repo, ledger }
    }

    pub fn ledger(&self) -> &CapacityLedger {
        &self.ledger
    }

    /// Creates or re-confirms the caller's booking for `event_id`.
    ///
    /// The seat is claimed before the booking row is written. If the write
    /// fails, the seat is handed back before the error is returned.
    pub async fn book(&self, user_id: &str, event_id: &str) -> Result<BookingOutcome, AppError> {
        let event_id = event_id.trim();
        if event_id.is_empty() {
            return Err(AppError::Validation("Event ID is required".into()));
        }

        let event = self.event_repo.find_by_id(event_id).await?
            .filter(|e| e.is_active)
            .ok_or(AppError::NotFound("Event not found or inactive".into()))?;

        if event.is_past(Utc::now()) {
            return Err(AppError::Validation("Cannot book an event that has already passed".into()));
        }

        let existing = self.booking_repo.find_by_user_and_event(user_id, &event.id).await?;
        let transition = plan(BookingState::from(existing.as_ref()), BookingAction::Book)?;

        self.ledger.increment(&event.id).await?;

        let written = match (transition, existing) {
            (Transition::Reconfirm, Some(row)) => self.booking_repo
                .transition_status(&row.id, BookingStatus::Cancelled, BookingStatus::Confirmed)
                .await
                .and_then(|flipped| flipped.ok_or_else(already_booked)),
            _ => self.booking_repo.create(&Booking::new(user_id.to_string(), event.id.clone())).await,
        };

        match written {
            Ok(booking) => {
                info!(booking_id = %booking.id, event_id = %event.id, user_id, ?transition, "booking confirmed");
                Ok(BookingOutcome { booking, transition })
            }
            Err(write_err) => Err(self.compensate(&event.id, write_err).await),
        }
    }

    /// Cancels a booking owned by `user_id` and releases its seat.
    pub async fn cancel(&self, user_id: &str, booking_id: &str) -> Result<Booking, AppError> {
        let existing = self.booking_repo.find_for_user(booking_id, user_id).await?;
        plan(BookingState::from(existing.as_ref()), BookingAction::Cancel)?;

        let cancelled = self.booking_repo
            .transition_status(booking_id, BookingStatus::Confirmed, BookingStatus::Cancelled)
            .await?
            .ok_or_else(already_cancelled)?;

        if let Err(e) = self.ledger.decrement(&cancelled.event_id).await {
            error!(
                event_id = %cancelled.event_id,
                booking_id = %cancelled.id,
                error = ?e,
                "ledger: seat release failed after cancel; bookings_count is inflated until reconciled"
            );
            return Err(AppError::InternalWithMsg(format!(
                "bookings_count drift on event {} after cancelling booking {}",
                cancelled.event_id, cancelled.id
            )));
        }

        info!(booking_id = %cancelled.id, event_id = %cancelled.event_id, user_id, "booking cancelled");
        Ok(cancelled)
    }

    /// Hands back a claimed seat after a failed booking write and returns the
    /// error the caller should see.
    async fn compensate(&self, event_id: &str, write_err: AppError) -> AppError {
        warn!(event_id, error = %write_err, "booking write failed, releasing claimed seat");

        match self.ledger.decrement(event_id).await {
            Ok(()) => write_err,
            Err(rollback_err) => {
                error!(
                    event_id,
                    write_error = %write_err,
                    rollback_error = ?rollback_err,
                    "ledger: compensating release failed; bookings_count is inflated until reconciled"
                );
                AppError::InternalWithMsg(format!("bookings_count drift on event {}", event_id))
            }
        }
    }
}
