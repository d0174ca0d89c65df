use serde::Serialize;
use crate::domain::models::{booking::Booking, contact::ContactMessage, event::EventWithOrganizer};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct EventResponse {
    pub message: String,
    pub event: EventWithOrganizer,
}

#[derive(Serialize)]
pub struct BookingResponse {
    pub message: String,
    pub booking: Booking,
}

#[derive(Serialize)]
pub struct ContactResponse {
    pub message: String,
    pub data: ContactMessage,
}
