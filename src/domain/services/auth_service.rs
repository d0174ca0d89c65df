use crate::domain::models::{auth::Claims, user::User};
use crate::error::AppError;
use crate::config::Config;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use chrono::{Duration, Utc};
use rand::rngs::OsRng;

pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl AuthService {
    pub fn new(config: &Config) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: Duration::hours(config.jwt_ttl_hours),
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::InternalWithMsg(format!("password hashing failed: {}", e)))
    }

    pub fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| AppError::InternalWithMsg(format!("stored password hash is malformed: {}", e)))?;

        Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            role: user.role.clone(),
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("JWT encoding failed: {}", e);
                AppError::Internal
            })
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::Unauthorized("Invalid token. Please login again.".into()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(ttl_hours: i64) -> AuthService {
        AuthService::new(&Config {
            database_url: "memory://".into(),
            port: 0,
            jwt_secret: "unit-test-secret-0123456789".into(),
            jwt_ttl_hours: ttl_hours,
        })
    }

    fn user() -> User {
        User::new("Ada".into(), "ada@example.com".into(), String::new(), None)
    }

    #[test]
    fn test_token_round_trip_carries_subject_and_role() {
        let auth = service(1);
        let user = user();
        let token = auth.issue_token(&user).unwrap();
        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, "user");
    }

    #[test]
    fn test_expired_token_is_distinguished() {
        let auth = service(-1);
        let token = auth.issue_token(&user()).unwrap();
        assert!(matches!(auth.verify_token(&token), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_tampered_token_is_unauthorized() {
        let auth = service(1);
        let token = auth.issue_token(&user()).unwrap();
        let other = AuthService::new(&Config {
            database_url: "memory://".into(),
            port: 0,
            jwt_secret: "a-completely-different-secret".into(),
            jwt_ttl_hours: 1,
        });
        assert!(matches!(other.verify_token(&token), Err(AppError::Unauthorized(_))));
        assert!(matches!(auth.verify_token("not-a-jwt"), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_password_hash_verifies() {
        let auth = service(1);
        let hash = auth.hash_password("hunter22").unwrap();
        assert!(auth.verify_password("hunter22", &hash).unwrap());
        assert!(!auth.verify_password("hunter23", &hash).unwrap());
    }
}
