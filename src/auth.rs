use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::User;

const TOKEN_TTL_HOURS: i64 = 24;
const BCRYPT_COST: u32 = 10;

/// Maps a bearer token to the current user id. Swappable so tests run
/// against a fixture instead of real tokens; which implementation is live
/// is decided by configuration at startup, never by request content.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<String>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    exp: i64,
}

/// HS256 issuer/verifier backed by the configured secret.
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtAuth {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String> {
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(e.into()))
    }
}

impl TokenVerifier for JwtAuth {
    fn verify(&self, token: &str) -> Result<String> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| AppError::Unauthorized("Token is not valid".to_string()))?;
        Ok(data.claims.sub)
    }
}

/// Fixture verifier: attributes every request to one fixed user id.
/// Wired only from configuration; requests cannot select it.
pub struct StaticVerifier {
    user_id: String,
}

impl StaticVerifier {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl TokenVerifier for StaticVerifier {
    fn verify(&self, _token: &str) -> Result<String> {
        Ok(self.user_id.clone())
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| AppError::Internal(e.into()))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}
