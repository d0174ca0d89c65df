use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl ContactMessage {
    pub fn new(name: String, email: String, message: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            message,
            created_at: Utc::now(),
        }
    }
}
