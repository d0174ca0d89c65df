use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const ROLE_USER: &str = "user";
pub const ROLE_ORGANIZER: &str = "organizer";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Self-registration may only pick `user` or `organizer`; anything else falls back to `user`.
    pub fn new(name: String, email: String, password_hash: String, requested_role: Option<&str>) -> Self {
        let role = match requested_role {
            Some(ROLE_ORGANIZER) => ROLE_ORGANIZER,
            _ => ROLE_USER,
        };

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email: email.trim().to_lowercase(),
            password_hash,
            role: role.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }
}

/// Minimal shape check: something before a single `@`, and a dotted domain after it.
pub fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
        }
        None => false,
    }
}

/// Public slice of a user joined into booking and event views.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[sqlx(rename = "user_id")]
    pub id: String,
    #[sqlx(rename = "user_name")]
    pub name: String,
    #[sqlx(rename = "user_email")]
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}
