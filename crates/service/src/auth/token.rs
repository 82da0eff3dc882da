//! Bearer-token issuance and validation (HS256 JWT).
//!
//! The signing key is decoded from base64 configuration exactly once at
//! startup and is immutable afterwards. Tokens are never persisted and never
//! revocable: validity is purely a function of signature and expiry.

use base64::prelude::*;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::{Account, AccountRole};
use super::errors::AuthError;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    email: Option<String>,
    iat: i64,
    exp: i64,
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiration_ms: i64,
}

impl TokenService {
    /// Build the service from a base64-encoded symmetric secret and a token
    /// lifetime in milliseconds.
    pub fn new(secret_base64: &str, expiration_ms: i64) -> Result<Self, AuthError> {
        let key = BASE64_STANDARD
            .decode(secret_base64.trim())
            .map_err(|e| AuthError::Token(format!("invalid base64 signing secret: {e}")))?;
        Ok(Self {
            encoding: EncodingKey::from_secret(&key),
            decoding: DecodingKey::from_secret(&key),
            expiration_ms,
        })
    }

    /// Sign a token carrying the account id as subject plus role and email
    /// claims, expiring `expiration_ms` from now.
    pub fn issue(&self, account: &Account) -> Result<String, AuthError> {
        let now = Utc::now();
        let expiry = now + Duration::milliseconds(self.expiration_ms);
        let claims = Claims {
            sub: account.id.to_string(),
            role: account.role.as_str().to_string(),
            email: account.email.clone(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Token(e.to_string()))
    }

    fn parse(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // No clock leeway: a token is invalid the instant it expires.
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::Token(e.to_string()))
    }

    /// True only if the signature verifies and the token has not expired.
    /// Malformed or truncated input is false, never an error; callers doing
    /// best-effort authentication must be able to rely on that.
    pub fn validate(&self, token: &str) -> bool {
        self.parse(token).is_ok()
    }

    /// Subject account id. Only meaningful after `validate` returned true.
    pub fn parse_subject(&self, token: &str) -> Result<Uuid, AuthError> {
        let claims = self.parse(token)?;
        Uuid::parse_str(&claims.sub)
            .map_err(|e| AuthError::Token(format!("invalid subject: {e}")))
    }

    /// Role claim. Only meaningful after `validate` returned true.
    pub fn parse_role(&self, token: &str) -> Result<AccountRole, AuthError> {
        let claims = self.parse(token)?;
        claims.role.parse().map_err(AuthError::Token)
    }

    /// Configured lifetime in whole seconds, for response payloads.
    pub fn expiry_in_seconds(&self) -> i64 {
        self.expiration_ms / 1000
    }
}
