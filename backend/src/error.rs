//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.

use crate::provider::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use toastspeech_shared::types::{ErrorDetail, ErrorResponse};
use toastspeech_shared::validation::ValidationError;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Email already in use")]
    DuplicateEmail,

    #[error("Auth creation failed")]
    ProviderAuth,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User profile not found")]
    AccountNotFound,

    /// Bad, expired or missing token, or a token whose account is gone.
    #[error("Invalid or expired token")]
    Unauthenticated,

    #[error("Validation error: {}", .0.user_message())]
    Validation(ValidationError),

    #[error("Provider error")]
    Provider(#[from] ProviderError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::DuplicateEmail | ApiError::ProviderAuth | ApiError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::InvalidCredentials | ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::AccountNotFound => StatusCode::NOT_FOUND,
            ApiError::Provider(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::DuplicateEmail => "DUPLICATE_EMAIL",
            ApiError::ProviderAuth => "PROVIDER_AUTH_ERROR",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::AccountNotFound => "ACCOUNT_NOT_FOUND",
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Provider(_) => "PROVIDER_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code().to_string();

        let (message, field) = match &self {
            ApiError::Validation(err) => (err.user_message(), Some(err.field.clone())),
            ApiError::Provider(err) => {
                error!("Provider error: {:?}", err);
                ("The identity provider could not complete the request".to_string(), None)
            }
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                ("An internal error occurred".to_string(), None)
            }
            other => (other.to_string(), None),
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code,
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
