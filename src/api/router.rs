use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, booking, contact, event, health};
use tower_http::{
    classify::ServerErrorsFailureClass,
    cors::CorsLayer,
    trace::TraceLayer,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/profile", get(auth::profile))

        // Events
        .route("/api/events", get(event::list_events).post(event::create_event))
        .route("/api/events/{id}", get(event::get_event).put(event::update_event).delete(event::delete_event))
        .route("/api/events/{id}/audit", get(event::audit_event))

        // Bookings
        .route("/api/bookings", post(booking::create_booking))
        .route("/api/bookings/my", get(booking::my_bookings))
        .route("/api/bookings/{id}/cancel", put(booking::cancel_booking))
        .route("/api/bookings/organizer", get(booking::organizer_bookings))
        .route("/api/bookings/event/{event_id}", get(booking::event_bookings))

        // Contact
        .route("/api/contact", post(contact::send_message).get(contact::list_messages))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
