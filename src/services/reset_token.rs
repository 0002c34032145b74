use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};

const RESET_PURPOSE: &str = "password-reset";
const RESET_TOKEN_MINUTES: i64 = 10;

#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    /// Canonical phone number the token was minted for.
    sub: String,
    purpose: String,
    iat: usize,
    exp: usize,
}

/// Stateless reset-token codec.
///
/// Mints a signed token asserting that the given phone number completed OTP
/// verification for password reset, valid for 10 minutes. Nothing is stored
/// server-side, so a minted token cannot be revoked before it expires.
#[derive(Clone)]
pub struct ResetTokenService {
    jwt_secret: String,
}

impl ResetTokenService {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    pub fn mint(&self, phone: &str) -> Result<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(Duration::minutes(RESET_TOKEN_MINUTES))
            .ok_or_else(|| AppError::service("Failed to calculate token expiration"))?;

        let claims = ResetClaims {
            sub: phone.to_string(),
            purpose: RESET_PURPOSE.to_string(),
            iat: now.timestamp() as usize,
            exp: expiration.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::service(format!("Token generation failed: {}", e)))
    }

    /// Check signature, expiry and purpose; return the embedded phone number.
    pub fn validate(&self, token: &str) -> Result<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<ResetClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::TokenInvalid,
        })?;

        if data.claims.purpose != RESET_PURPOSE {
            return Err(AppError::TokenPurposeMismatch);
        }

        Ok(data.claims.sub)
    }
}
