use axum::{extract::{rejection::JsonRejection, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::ContactRequest, responses::ContactResponse};
use crate::api::extractors::{auth::AdminUser, maybe_auth::MaybeAuthUser};
use crate::domain::models::{contact::ContactMessage, user::looks_like_email};
use std::sync::Arc;
use tracing::info;

const MIN_NAME_LEN: usize = 2;
const MIN_MESSAGE_LEN: usize = 10;

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(caller): MaybeAuthUser,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    // Signed-in callers write as themselves.
    let (name, email) = match caller {
        Some(user) => (user.name, user.email),
        None => (payload.name.unwrap_or_default(), payload.email.unwrap_or_default()),
    };
    let message = payload.message.unwrap_or_default();

    if message.trim().chars().count() < MIN_MESSAGE_LEN {
        return Err(AppError::Validation(format!("Message must be at least {} characters long", MIN_MESSAGE_LEN)));
    }
    if name.trim().chars().count() < MIN_NAME_LEN {
        return Err(AppError::Validation(format!("Name must be at least {} characters long", MIN_NAME_LEN)));
    }
    if !looks_like_email(&email) {
        return Err(AppError::Validation("Please provide a valid email address".into()));
    }

    let saved = state.contact_repo.create(&ContactMessage::new(name, email, message)).await?;

    info!(contact_id = %saved.id, "Contact message stored");

    Ok((StatusCode::CREATED, Json(ContactResponse {
        message: "Message sent successfully!".into(),
        data: saved,
    })))
}

pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.contact_repo.list().await?))
}
