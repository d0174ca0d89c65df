use axum::{extract::{rejection::JsonRejection, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{LoginRequest, RegisterRequest};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::auth::{AuthResponse, UserProfile};
use crate::domain::models::user::{looks_like_email, User};
use std::sync::Arc;
use tracing::info;

const MIN_PASSWORD_LEN: usize = 6;

fn required(field: Option<String>) -> Option<String> {
    field.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let (Some(name), Some(email), Some(password)) = (
        required(payload.name),
        required(payload.email),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Validation("All fields are required".into()));
    };

    if !looks_like_email(&email) {
        return Err(AppError::Validation("Please provide a valid email address".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!("Password must be at least {} characters long", MIN_PASSWORD_LEN)));
    }

    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = state.auth_service.hash_password(&password)?;
    let user = User::new(name, email, password_hash, payload.role.as_deref());
    let user = state.user_repo.create(&user).await?;

    let token = state.auth_service.issue_token(&user)?;

    info!(user_id = %user.id, role = %user.role, "User registered");

    Ok((StatusCode::CREATED, Json(AuthResponse {
        message: "User registered successfully".into(),
        token,
        user: UserProfile::from(&user),
    })))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let (Some(email), Some(password)) = (required(payload.email), payload.password.filter(|p| !p.is_empty())) else {
        return Err(AppError::Validation("Email and password are required".into()));
    };

    let invalid = || AppError::Unauthorized("Invalid email or password".into());

    let user = state.user_repo.find_by_email(&email).await?
        .ok_or_else(invalid)?;

    if !state.auth_service.verify_password(&password, &user.password_hash)? {
        return Err(invalid());
    }

    let token = state.auth_service.issue_token(&user)?;

    info!("User logged in: {}", user.id);

    Ok(Json(AuthResponse {
        message: "Login successful".into(),
        token,
        user: UserProfile::from(&user),
    }))
}

pub async fn profile(AuthUser(user): AuthUser) -> Result<impl IntoResponse, AppError> {
    Ok(Json(UserProfile::from(&user)))
}
