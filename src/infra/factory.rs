use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::infra::repositories::{
    memory_store::MemoryStore,
    postgres_booking_repo::PostgresBookingRepo, postgres_contact_repo::PostgresContactRepo,
    postgres_event_repo::PostgresEventRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_contact_repo::SqliteContactRepo,
    sqlite_event_repo::SqliteEventRepo, sqlite_user_repo::SqliteUserRepo,
};

pub const MEMORY_URL: &str = "memory://";

/// The connection pool behind an `AppState`, kept so it can be closed on shutdown.
#[derive(Clone)]
pub enum Store {
    Postgres(PgPool),
    Sqlite(SqlitePool),
    Memory(MemoryStore),
}

impl Store {
    pub async fn close(&self) {
        match self {
            Store::Postgres(pool) => pool.close().await,
            Store::Sqlite(pool) => pool.close().await,
            Store::Memory(_) => {}
        }
        info!("Store closed");
    }
}

pub async fn bootstrap_state(config: &Config) -> Result<(AppState, Store), AppError> {
    let database_url = &config.database_url;

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let opts = PgConnectOptions::from_str(database_url)?
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await?;

        run_postgres_migrations(&pool).await?;

        let state = AppState::new(
            config.clone(),
            Arc::new(PostgresUserRepo::new(pool.clone())),
            Arc::new(PostgresEventRepo::new(pool.clone())),
            Arc::new(PostgresBookingRepo::new(pool.clone())),
            Arc::new(PostgresContactRepo::new(pool.clone())),
        );
        Ok((state, Store::Postgres(pool)))
    } else if database_url == MEMORY_URL {
        info!("Using in-memory store; data is lost on exit");

        let store = MemoryStore::new();
        let state = AppState::new(
            config.clone(),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        );
        Ok((state, Store::Memory(store)))
    } else {
        info!("Initializing SQLite connection...");

        let opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        run_sqlite_migrations(&pool).await?;

        let state = AppState::new(
            config.clone(),
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteEventRepo::new(pool.clone())),
            Arc::new(SqliteBookingRepo::new(pool.clone())),
            Arc::new(SqliteContactRepo::new(pool.clone())),
        );
        Ok((state, Store::Sqlite(pool)))
    }
}

async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Postgres migrations failed: {}", e)))
}

async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("SQLite migrations failed: {}", e)))
}
