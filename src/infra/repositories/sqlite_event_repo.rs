use crate::domain::{models::event::{Event, EventWithOrganizer}, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

const SELECT_WITH_ORGANIZER: &str =
    "SELECT e.*, u.id AS user_id, u.name AS user_name, u.email AS user_email
     FROM events e JOIN users u ON u.id = e.organizer_id";

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, title, description, date, location, image, capacity, bookings_count,
                is_active, status, organizer_id, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_with_organizer(&self, id: &str) -> Result<Option<EventWithOrganizer>, AppError> {
        sqlx::query_as::<_, EventWithOrganizer>(&format!("{} WHERE e.id = ?", SELECT_WITH_ORGANIZER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active(&self) -> Result<Vec<EventWithOrganizer>, AppError> {
        sqlx::query_as::<_, EventWithOrganizer>(&format!("{} WHERE e.is_active = 1 ORDER BY e.date ASC", SELECT_WITH_ORGANIZER))
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
                title = ?, description = ?, date = ?, location = ?, image = ?,
                capacity = ?, status = ?, updated_at = ?
               WHERE id = ? AND bookings_count <= ?
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
            .bind(event.capacity)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn deactivate(&self, id: &str) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>("UPDATE events SET is_active = 0, updated_at = ? WHERE id = ? RETURNING *")
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Event not found".into()))
    }

    async fn try_increment_bookings(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE events SET bookings_count = bookings_count + 1, updated_at = ?
             WHERE id = ? AND is_active = 1 AND bookings_count < capacity"
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
            "UPDATE events SET
                bookings_count = CASE WHEN bookings_count > 0 THEN bookings_count - 1 ELSE 0 END,
                updated_at = ?
             WHERE id = ?
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
                updated_at = ?
             WHERE id = ?
             RETURNING bookings_count"
        )
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
