//! JWT token issuance and validation
//!
//! Tokens are HS256-signed and carry exactly `{sub, email, exp}`. There is
//! no server-side revocation; a token is valid while its signature checks
//! out and `exp` has not passed.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use toastspeech_shared::errors::AuthError;

use crate::config::MAX_ACCESS_TOKEN_EXPIRY_SECS;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Pre-computed JWT keys for efficient token operations
/// These are expensive to create, so we cache them in AppState
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    /// This should be called once at startup
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// Issues and validates bearer tokens
///
/// Cheap to clone; keys are shared behind `Arc`.
#[derive(Clone)]
pub struct TokenService {
    keys: JwtKeys,
    ttl: Duration,
    validation: Arc<Validation>,
}

impl TokenService {
    /// Create a token service with pre-computed keys
    ///
    /// Call this once at application startup and store in AppState.
    /// The lifetime is clamped to `0..=MAX_ACCESS_TOKEN_EXPIRY_SECS`.
    pub fn new(secret: &str, access_token_expiry_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            keys: JwtKeys::new(secret),
            ttl: Duration::seconds(access_token_expiry_secs.clamp(0, MAX_ACCESS_TOKEN_EXPIRY_SECS)),
            validation: Arc::new(validation),
        }
    }

    /// Issue a token for `subject` using the configured lifetime
    #[inline]
    pub fn issue(&self, subject: &str, email: &str) -> Result<String, AuthError> {
        self.issue_with_ttl(subject, email, self.ttl)
    }

    /// Issue a token with an explicit lifetime
    pub fn issue_with_ttl(
        &self,
        subject: &str,
        email: &str,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::TokenCreation("expiry out of range".to_string()))?;

        let claims = Claims {
            sub: subject.to_string(),
            email: email.to_string(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, self.keys.encoding())
            .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Validate a token and return its claims
    pub fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, self.keys.decoding(), &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                AuthError::InvalidToken
            })?;

        Ok(token_data.claims)
    }

    /// Validate a token and return its subject
    ///
    /// Does not check that the subject still exists.
    pub fn validate(&self, token: &str) -> Result<String, AuthError> {
        let claims = self.decode_claims(token)?;
        if claims.sub.is_empty() {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims.sub)
    }

    /// Configured token lifetime
    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
