use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub capacity: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub capacity: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub event_id: Option<String>,
}

#[derive(Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}
