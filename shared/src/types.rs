//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Account;

/// Token scheme reported to clients
pub const TOKEN_TYPE: &str = "bearer";

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Signup request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(email(message = "is not a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age_group: Option<String>,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    pub purposes: Option<Vec<String>>,
    #[serde(default)]
    pub custom_purpose: Option<String>,
}

/// Signin request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(email(message = "is not a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

/// Account as returned to clients
///
/// Every field is always present; missing optionals serialize as `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub gender: Option<String>,
    pub age_group: Option<String>,
    pub profession: Option<String>,
    pub purposes: Option<Vec<String>>,
    pub custom_purpose: Option<String>,
    pub subscription_plan: Option<String>,
    pub subscription_status: Option<String>,
    pub created_at: Option<String>,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            gender: account.gender,
            age_group: account.age_group,
            profession: account.profession,
            purposes: account.purposes,
            custom_purpose: account.custom_purpose,
            subscription_plan: account.subscription_plan,
            subscription_status: account.subscription_status,
            created_at: account.created_at,
        }
    }
}

/// Signup/signin response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub message: String,
    pub user: AccountView,
}

impl TokenResponse {
    pub fn bearer(access_token: String, message: &str, user: AccountView) -> Self {
        Self {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
            message: message.to_string(),
            user,
        }
    }
}
