//! External identity and data provider
//!
//! The provider owns password storage, identity verification and the
//! `users` / `subscription_usage` tables. The rest of the backend talks to
//! it only through [`IdentityProvider`].

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use toastspeech_shared::models::{Account, UsageRecord};

mod memory;
mod supabase;

pub use memory::InMemoryProvider;
pub use supabase::SupabaseProvider;

/// Credentialed identity created or verified by the provider
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Provider call failures
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected provider response: {0}")]
    Decode(String),
}

/// Narrow interface over the provider
///
/// Every call is a single unretried round-trip.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Whether an account row with this email exists
    async fn email_exists(&self, email: &str) -> Result<bool, ProviderError>;

    /// Create an identity with the email pre-confirmed
    async fn create_identity(&self, email: &str, password: &str) -> Result<Identity, ProviderError>;

    /// Verify credentials; `None` when the provider rejects them
    async fn verify_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Identity>, ProviderError>;

    async fn insert_account(&self, account: &Account) -> Result<(), ProviderError>;

    async fn find_account(&self, id: &str) -> Result<Option<Account>, ProviderError>;

    async fn insert_usage(&self, usage: &UsageRecord) -> Result<(), ProviderError>;

    async fn find_usage(
        &self,
        user_id: &str,
        month: u32,
        year: i32,
    ) -> Result<Option<UsageRecord>, ProviderError>;
}
