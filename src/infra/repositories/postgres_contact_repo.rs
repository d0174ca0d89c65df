use crate::domain::{models::contact::ContactMessage, ports::ContactRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresContactRepo {
    pool: PgPool,
}

impl PostgresContactRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PostgresContactRepo {
    async fn create(&self, message: &ContactMessage) -> Result<ContactMessage, AppError> {
        sqlx::query_as::<_, ContactMessage>(
            "INSERT INTO contacts (id, name, email, message, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *"
        )
            .bind(&message.id).bind(&message.name).bind(&message.email).bind(&message.message).bind(message.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<ContactMessage>, AppError> {
        sqlx::query_as::<_, ContactMessage>("SELECT * FROM contacts ORDER BY created_at DESC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
