pub mod auth_service;
pub mod booking_queries;
pub mod booking_service;
pub mod capacity_ledger;
pub mod event_rules;
