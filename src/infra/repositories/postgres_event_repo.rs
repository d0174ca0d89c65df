use crate::domain::{models::event::{Event, EventWithOrganizer}, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

const SELECT_WITH_ORGANIZER: &str =
    "SELECT e.*, u.id AS user_id, u.name AS user_name, u.email AS user_email
     FROM events e JOIN users u ON u.id = e.organizer_id";

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, title, description, date, location, image, capacity, bookings_count,
                is_active, status, organizer_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *"#
        )
            .bind(&event.id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.date)
            .bind(&event.location)
            .bind(&event.image)
            .bind(event.capacity)
            .bind(event.bookings_count)
            .bind(event.is_active)
            .bind(event.status)
            .bind(&event.organizer_id)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_with_organizer(&self, id: &str) -> Result<Option<EventWithOrganizer>, AppError> {
        sqlx::query_as::<_, EventWithOrganizer>(&format!("{} WHERE e.id = $1", SELECT_WITH_ORGANIZER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active(&self) -> Result<Vec<EventWithOrganizer>, AppError> {
        sqlx::query_as::<_, EventWithOrganizer>(&format!("{} WHERE e.is_active ORDER BY e.date ASC", SELECT_WITH_ORGANIZER))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_ids(&self) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>("SELECT id FROM events ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                title = $1, description = $2, date = $3, location = $4, image = $5,
                capacity = $6, status = $7, updated_at = $8
               WHERE id = $9 AND bookings_count <= $6
               RETURNING *"#
        )
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.date)
            .bind(&event.location)
            .bind(&event.image)
            .bind(event.capacity)
            .bind(event.status)
            .bind(event.updated_at)
            .bind(&event.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn deactivate(&self, id: &str) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>("UPDATE events SET is_active = FALSE, updated_at = $1 WHERE id = $2 RETURNING *")
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Event not found".into()))
    }

    async fn try_increment_bookings(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE events SET bookings_count = bookings_count + 1, updated_at = $1
             WHERE id = $2 AND is_active AND bookings_count < capacity"
        )
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() == 1)
    }

    async fn decrement_bookings(&self, id: &str) -> Result<Option<i32>, AppError> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE events SET bookings_count = GREATEST(bookings_count - 1, 0), updated_at = $1
             WHERE id = $2
             RETURNING bookings_count"
        )
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn recount_bookings(&self, id: &str) -> Result<Option<i32>, AppError> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE events SET
                bookings_count = (
                    SELECT COUNT(*) FROM bookings
                    WHERE bookings.event_id = events.id AND bookings.status = 'confirmed'
                ),
                updated_at = $1
             WHERE id = $2
             RETURNING bookings_count"
        )
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
