pub mod auth;
pub mod booking;
pub mod contact;
pub mod event;
pub mod health;
