use crate::domain::{
    models::booking::{Booking, BookingStatus, BookingWithEvent, BookingWithUser, OrganizerBookingView},
    ports::BookingRepository,
};
use crate::error::{is_unique_violation, AppError};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

// `b.event_id` and `b.user_id` double as the ids of the joined summaries.
const EVENT_COLUMNS: &str =
    "e.title AS event_title, e.date AS event_date, e.location AS event_location,
     e.capacity AS event_capacity, e.bookings_count AS event_bookings_count,
     e.organizer_id AS event_organizer_id, e.is_active AS event_is_active, e.status AS event_status";
const USER_COLUMNS: &str = "u.name AS user_name, u.email AS user_email";

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, user_id, event_id, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.user_id).bind(&booking.event_id)
            .bind(booking.status).bind(booking.created_at).bind(booking.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict("You already have a booking for this event.".into())
                } else {
                    AppError::Database(e)
                }
            })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_user_and_event(&self, user_id: &str, event_id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE user_id = $1 AND event_id = $2")
            .bind(user_id).bind(event_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_for_user(&self, id: &str, user_id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 AND user_id = $2")
            .bind(id).bind(user_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn transition_status(&self, id: &str, from: BookingStatus, to: BookingStatus) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("UPDATE bookings SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4 RETURNING *")
            .bind(to).bind(Utc::now()).bind(id).bind(from)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn count_confirmed(&self, event_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings WHERE event_id = $1 AND status = 'confirmed'")
            .bind(event_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<BookingWithEvent>, AppError> {
        let sql = format!(
            "SELECT b.*, {} FROM bookings b
             JOIN events e ON e.id = b.event_id
             WHERE b.user_id = $1
             ORDER BY b.created_at DESC",
            EVENT_COLUMNS
        );
        sqlx::query_as::<_, BookingWithEvent>(&sql).bind(user_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<BookingWithUser>, AppError> {
        let sql = format!(
            "SELECT b.*, {} FROM bookings b
             JOIN users u ON u.id = b.user_id
             WHERE b.event_id = $1
             ORDER BY b.created_at DESC",
            USER_COLUMNS
        );
        sqlx::query_as::<_, BookingWithUser>(&sql).bind(event_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<OrganizerBookingView>, AppError> {
        let sql = format!(
            "SELECT b.*, {}, {} FROM bookings b
             JOIN events e ON e.id = b.event_id
             JOIN users u ON u.id = b.user_id
             WHERE e.organizer_id = $1
             ORDER BY b.created_at DESC",
            EVENT_COLUMNS, USER_COLUMNS
        );
        sqlx::query_as::<_, OrganizerBookingView>(&sql).bind(organizer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
