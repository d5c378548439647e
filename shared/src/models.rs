//! Data models for the ToastSpeech application
//!
//! Both records are owned by the external provider. The backend only
//! reads and writes them through provider calls and never caches them.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::types::SignupRequest;

/// Plan assigned to every new account
pub const DEFAULT_SUBSCRIPTION_PLAN: &str = "free";

/// Status assigned to every new account
pub const DEFAULT_SUBSCRIPTION_STATUS: &str = "active";

/// Monthly speech allowance for a new account
pub const DEFAULT_SPEECHES_LIMIT: i32 = 1;

/// Monthly evaluation allowance for a new account
pub const DEFAULT_EVALUATIONS_LIMIT: i32 = 1;

/// User account (the `users` table at the provider)
///
/// `id` is assigned by the provider's identity service and never changes.
/// It joins the account to its usage records and to token subjects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
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
    #[serde(default)]
    pub subscription_plan: Option<String>,
    #[serde(default)]
    pub subscription_status: Option<String>,
    /// Assigned by the provider on insert, so never sent on writes.
    /// Opaque provider text; may or may not carry a time zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Account {
    /// Build the profile row for a freshly created identity
    pub fn from_signup(id: impl Into<String>, req: &SignupRequest) -> Self {
        Self {
            id: id.into(),
            name: req.name.clone(),
            email: req.email.clone(),
            gender: req.gender.clone(),
            age_group: req.age_group.clone(),
            profession: req.profession.clone(),
            purposes: req.purposes.clone(),
            custom_purpose: req.custom_purpose.clone(),
            subscription_plan: Some(DEFAULT_SUBSCRIPTION_PLAN.to_string()),
            subscription_status: Some(DEFAULT_SUBSCRIPTION_STATUS.to_string()),
            created_at: None,
        }
    }
}

/// Per-account monthly usage counters (the `subscription_usage` table)
///
/// Keyed by `(user_id, month, year)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageRecord {
    pub user_id: String,
    pub month: u32,
    pub year: i32,
    pub speeches_limit: i32,
    pub speeches_used: i32,
    pub evaluations_limit: i32,
    pub evaluations_used: i32,
}

impl UsageRecord {
    /// Initial record written at signup for the month containing `now`
    pub fn initial(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            month: now.month(),
            year: now.year(),
            speeches_limit: DEFAULT_SPEECHES_LIMIT,
            speeches_used: 0,
            evaluations_limit: DEFAULT_EVALUATIONS_LIMIT,
            evaluations_used: 0,
        }
    }
}
