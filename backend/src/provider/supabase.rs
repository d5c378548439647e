//! Supabase-compatible REST client
//!
//! Identity calls go to the GoTrue API under `/auth/v1`, table reads and
//! writes to PostgREST under `/rest/v1`. Every request carries the service
//! key both as `apikey` and as a bearer credential.

use super::{Identity, IdentityProvider, ProviderError};
use crate::config::ProviderConfig;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use toastspeech_shared::models::{Account, UsageRecord};
use tracing::debug;

const USERS_TABLE: &str = "/rest/v1/users";
const USAGE_TABLE: &str = "/rest/v1/subscription_usage";

/// Password grant response; only the user is of interest
#[derive(Debug, Deserialize)]
struct SessionResponse {
    user: Identity,
}

/// Provider client backed by a Supabase project
pub struct SupabaseProvider {
    client: Client,
    base_url: String,
    service_key: SecretString,
}

impl SupabaseProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            service_key: SecretString::new(config.service_key.clone()),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let key = self.service_key.expose_secret();
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("apikey", key.as_str())
            .bearer_auth(key)
    }

    async fn insert_row<T: serde::Serialize + ?Sized>(
        &self,
        table: &str,
        row: &T,
    ) -> Result<(), ProviderError> {
        let response = self
            .request(Method::POST, table)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn select_rows<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>, ProviderError> {
        let response = self
            .request(Method::GET, table)
            .query(filters)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

/// Turn non-2xx responses into `ProviderError::Status`
async fn ensure_success(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        status: status.as_u16(),
        message,
    })
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

#[async_trait]
impl IdentityProvider for SupabaseProvider {
    async fn email_exists(&self, email: &str) -> Result<bool, ProviderError> {
        let rows: Vec<serde_json::Value> = self
            .select_rows(
                USERS_TABLE,
                &[("select", "email".to_string()), ("email", eq(email))],
            )
            .await?;
        Ok(!rows.is_empty())
    }

    async fn create_identity(&self, email: &str, password: &str) -> Result<Identity, ProviderError> {
        let response = self
            .request(Method::POST, "/auth/v1/admin/users")
            .json(&json!({
                "email": email,
                "password": password,
                "email_confirm": true,
            }))
            .send()
            .await?;
        let response = ensure_success(response).await?;

        response
            .json::<Identity>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }

    async fn verify_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Identity>, ProviderError> {
        let response = self
            .request(Method::POST, "/auth/v1/token")
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        // GoTrue answers a bad password with 400 invalid_grant
        if matches!(
            response.status(),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED
        ) {
            debug!(status = %response.status(), "Provider rejected credentials");
            return Ok(None);
        }
        let response = ensure_success(response).await?;

        let session = response
            .json::<SessionResponse>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        Ok(Some(session.user))
    }

    async fn insert_account(&self, account: &Account) -> Result<(), ProviderError> {
        self.insert_row(USERS_TABLE, account).await
    }

    async fn find_account(&self, id: &str) -> Result<Option<Account>, ProviderError> {
        let rows: Vec<Account> = self
            .select_rows(USERS_TABLE, &[("select", "*".to_string()), ("id", eq(id))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_usage(&self, usage: &UsageRecord) -> Result<(), ProviderError> {
        self.insert_row(USAGE_TABLE, usage).await
    }

    async fn find_usage(
        &self,
        user_id: &str,
        month: u32,
        year: i32,
    ) -> Result<Option<UsageRecord>, ProviderError> {
        let rows: Vec<UsageRecord> = self
            .select_rows(
                USAGE_TABLE,
                &[
                    ("select", "*".to_string()),
                    ("user_id", eq(user_id)),
                    ("month", eq(month)),
                    ("year", eq(year)),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }
}
