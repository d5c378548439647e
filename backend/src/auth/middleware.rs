//! Bearer token extraction
//!
//! Pulls the raw token out of `Authorization: Bearer <token>`. Validation
//! and the account lookup happen in the account service so that every
//! failure collapses into the same 401.

use crate::error::ApiError;
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};

/// Raw bearer token presented by the client
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl BearerToken {
    /// Parse the token out of request headers
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ApiError> {
        let auth_header = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        // Scheme is case-insensitive
        let (scheme, token) = auth_header
            .split_once(' ')
            .ok_or(ApiError::Unauthenticated)?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(ApiError::Unauthenticated);
        }

        let token = token.trim();
        if token.is_empty() {
            return Err(ApiError::Unauthenticated);
        }

        Ok(BearerToken(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)
    }
}
