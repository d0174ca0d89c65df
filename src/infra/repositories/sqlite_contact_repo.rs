use crate::domain::{models::contact::ContactMessage, ports::ContactRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteContactRepo {
    pool: SqlitePool,
}

impl SqliteContactRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for SqliteContactRepo {
    async fn create(&self, message: &ContactMessage) -> Result<ContactMessage, AppError> {
        sqlx::query_as::<_, ContactMessage>(
            "INSERT INTO contacts (id, name, email, message, created_at) VALUES (?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&message.id).bind(&message.name).bind(&message.email).bind(&message.message).bind(message.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<ContactMessage>, AppError> {
        sqlx::query_as::<_, ContactMessage>("SELECT * FROM contacts ORDER BY created_at DESC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
