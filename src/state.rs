use std::sync::Arc;
use crate::domain::ports::{BookingRepository, ContactRepository, EventRepository, UserRepository};
use crate::domain::services::{
    auth_service::AuthService,
    booking_queries::BookingQueries,
    booking_service::BookingService,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub contact_repo: Arc<dyn ContactRepository>,
    pub auth_service: Arc<AuthService>,
    pub booking_service: Arc<BookingService>,
    pub booking_queries: Arc<BookingQueries>,
}

impl AppState {
    /// Wires the services on top of a set of repositories.
    pub fn new(
        config: Config,
        user_repo: Arc<dyn UserRepository>,
        event_repo: Arc<dyn EventRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        contact_repo: Arc<dyn ContactRepository>,
    ) -> Self {
        let auth_service = Arc::new(AuthService::new(&config));
        let booking_service = Arc::new(BookingService::new(event_repo.clone(), booking_repo.clone()));
        let booking_queries = Arc::new(BookingQueries::new(event_repo.clone(), booking_repo.clone()));

        Self {
            config,
            user_repo,
            event_repo,
            booking_repo,
            contact_repo,
            auth_service,
            booking_service,
            booking_queries,
        }
    }
}
