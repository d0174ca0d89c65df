//! Recounts `bookings_count` from the booking rows.
//!
//! `reconcile` repairs every event; `reconcile <EVENT_ID>` repairs one.
//!
//! Stop the server first. A seat claimed by an in-flight booking whose row is
//! not yet written is not counted, so a recount under live traffic can leave
//! the counter one short and admit an extra booking.

use colored::*;
use event_booking_backend::{config::Config, infra::factory::bootstrap_state};
use std::env;
use std::error::Error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(e) = run(env::args().nth(1)).await {
        eprintln!("{} {}", "❌ reconcile failed:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(event_id: Option<String>) -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    let (state, store) = bootstrap_state(&config).await?;
    let ledger = state.booking_service.ledger();

    println!(
        "{}",
        "⚠️  Recounting against a live store undercounts in-flight bookings; make sure the server is stopped."
            .yellow()
    );

    let event_ids = match event_id {
        Some(id) => vec![id],
        None => state.event_repo.list_ids().await?,
    };

    println!("{:<38} | {:<10} | {:<10}", "Event", "Recorded", "Recounted");
    println!("{:-<38}-+-{:-<10}-+-{:-<10}", "", "", "");

    let mut repaired = 0;
    for id in &event_ids {
        let before = ledger.audit(id).await?;
        let after = ledger.reconcile(id).await?;

        let line = format!("{:<38} | {:<10} | {:<10}", id, before.recorded, after.recorded);
        if before.consistent {
            println!("{}", line);
        } else {
            repaired += 1;
            println!("{}", line.yellow());
        }
    }

    println!("\n{} events checked, {} repaired", event_ids.len(), repaired);

    store.close().await;
    Ok(())
}
