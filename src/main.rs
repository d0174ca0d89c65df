#[tokio::main]
async fn main() {
    if let Err(e) = event_booking_backend::run().await {
        eprintln!("event-booking-backend failed to start: {}", e);
        std::process::exit(1);
    }
}
