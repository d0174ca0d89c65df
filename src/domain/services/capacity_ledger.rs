use std::sync::Arc;
use crate::domain::ports::{BookingRepository, EventRepository};
use crate::error::AppError;
use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerAudit {
    pub event_id: String,
    pub recorded: i32,
    pub confirmed: i64,
    pub consistent: bool,
}

/// Keeps `Event::bookings_count` in step with the confirmed bookings of each event.
/// The counter is a cache; the booking rows are authoritative.
#[derive(Clone)]
pub struct CapacityLedger {
    event_repo: Arc<dyn EventRepository>,
    booking_repo: Arc<dyn BookingRepository>,
}

impl CapacityLedger {
    pub fn new(event_repo: Arc<dyn EventRepository>, booking_repo: Arc<dyn BookingRepository>) -> Self {
        Self { event_repo, booking_repo }
    }

    /// Claims one seat. The capacity check and the increment are one store operation.
    pub async fn increment(&self, event_id: &str) -> Result<(), AppError> {
        if self.event_repo.try_increment_bookings(event_id).await? {
            info!(event_id, "ledger: seat claimed");
            return Ok(());
        }

        match self.event_repo.find_by_id(event_id).await? {
            Some(event) if event.is_active => {
                info!(event_id, capacity = event.capacity, "ledger: admission refused, event full");
                Err(AppError::Conflict("Event is fully booked.".into()))
            }
            _ => Err(AppError::NotFound("Event not found or inactive".into())),
        }
    }

    /// Releases one seat, never going below zero.
    pub async fn decrement(&self, event_id: &str) -> Result<(), AppError> {
        match self.event_repo.decrement_bookings(event_id).await? {
            Some(0) => {
                warn!(event_id, "ledger: seat released, counter at floor");
                Ok(())
            }
            Some(count) => {
                info!(event_id, bookings_count = count, "ledger: seat released");
                Ok(())
            }
            None => Err(AppError::NotFound("Event not found".into())),
        }
    }

    /// Compares the cached counter with the booking rows without changing anything.
    pub async fn audit(&self, event_id: &str) -> Result<LedgerAudit, AppError> {
        let event = self.event_repo.find_by_id(event_id).await?
            .ok_or(AppError::NotFound("Event not found".into()))?;
        let confirmed = self.booking_repo.count_confirmed(event_id).await?;

        Ok(LedgerAudit {
            event_id: event.id,
            recorded: event.bookings_count,
            confirmed,
            consistent: i64::from(event.bookings_count) == confirmed,
        })
    }

    /// Rewrites the counter from the booking rows. Meant for maintenance, not the
    /// booking path: a seat claimed but not yet written is not counted.
    pub async fn reconcile(&self, event_id: &str) -> Result<LedgerAudit, AppError> {
        let before = self.audit(event_id).await?;

        let recounted = self.event_repo.recount_bookings(event_id).await?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        if before.recorded != recounted {
            error!(
                event_id,
                recorded = before.recorded,
                recounted,
                "ledger: bookings_count drift repaired"
            );
        }

        Ok(LedgerAudit {
            event_id: before.event_id,
            recorded: recounted,
            confirmed: i64::from(recounted),
            consistent: true,
        })
    }
}
