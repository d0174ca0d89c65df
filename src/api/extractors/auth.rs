use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header::AUTHORIZATION, request::Parts},
};
use crate::state::AppState;
use crate::domain::models::user::{User, ROLE_ADMIN, ROLE_ORGANIZER};
use crate::error::AppError;
use std::sync::Arc;
use tracing::Span;

/// Authenticated caller, resolved from `Authorization: Bearer <jwt>` and re-read from the store.
pub struct AuthUser(pub User);

/// An `AuthUser` whose role is `organizer`.
pub struct OrganizerUser(pub User);

/// An `AuthUser` whose role is `admin`.
pub struct AdminUser(pub User);

pub(crate) fn bearer_token(parts: &Parts) -> Option<String> {
    parts.headers.get(AUTHORIZATION)?
        .to_str().ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

pub(crate) async fn resolve_user(app_state: &AppState, token: &str) -> Result<User, AppError> {
    let claims = app_state.auth_service.verify_token(token)?;

    app_state.user_repo.find_by_id(&claims.sub).await?
        .ok_or(AppError::Unauthorized("User no longer exists".into()))
}

fn require_role(user: User, role: &str) -> Result<User, AppError> {
    if !user.has_role(role) {
        return Err(AppError::Forbidden(format!("Access denied: requires {} role", role)));
    }
    Ok(user)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or(AppError::Unauthorized("No token, authorization denied".into()))?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let user = resolve_user(&app_state, &token).await?;

        Span::current().record("user_id", user.id.as_str());

        Ok(AuthUser(user))
    }
}

impl<S> FromRequestParts<S> for OrganizerUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        require_role(user, ROLE_ORGANIZER).map(OrganizerUser)
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        require_role(user, ROLE_ADMIN).map(AdminUser)
    }
}
