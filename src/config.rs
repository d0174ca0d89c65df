use std::env;
use thiserror::Error;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_JWT_TTL_HOURS: i64 = 24 * 7;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < 16 {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: "must be at least 16 characters".into(),
            });
        }

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                reason: format!("'{}' is not a port number", raw),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let jwt_ttl_hours = match env::var("JWT_TTL_HOURS") {
            Ok(raw) => match raw.parse::<i64>() {
                Ok(hours) if hours > 0 => hours,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "JWT_TTL_HOURS",
                        reason: format!("'{}' is not a positive number of hours", raw),
                    })
                }
            },
            Err(_) => DEFAULT_JWT_TTL_HOURS,
        };

        Ok(Self { database_url, port, jwt_secret, jwt_ttl_hours })
    }
}
