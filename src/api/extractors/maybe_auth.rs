use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::state::AppState;
use crate::domain::models::user::User;
use crate::error::AppError;
use crate::api::extractors::auth::{bearer_token, resolve_user};
use std::sync::Arc;
use tracing::{debug, Span};

/// Caller identity for public routes. A missing or unusable token yields a guest.
pub struct MaybeAuthUser(pub Option<User>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(MaybeAuthUser(None));
        };

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        match resolve_user(&app_state, &token).await {
            Ok(user) => {
                Span::current().record("user_id", user.id.as_str());
                Ok(MaybeAuthUser(Some(user)))
            }
            Err(AppError::Database(e)) => Err(AppError::Database(e)),
            Err(e) => {
                // Expired or forged token on a public route: treat as guest.
                debug!("MaybeAuth: ignoring token: {}", e);
                Ok(MaybeAuthUser(None))
            }
        }
    }
}
