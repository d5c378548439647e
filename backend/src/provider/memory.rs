//! In-process provider used by tests and local runs without a project

use super::{Identity, IdentityProvider, ProviderError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use toastspeech_shared::models::{Account, UsageRecord};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredIdentity {
    id: String,
    password: String,
}

#[derive(Debug, Default)]
struct Tables {
    /// Keyed by email
    identities: HashMap<String, StoredIdentity>,
    /// Keyed by account id
    accounts: HashMap<String, Account>,
    usage: Vec<UsageRecord>,
}

/// Provider that keeps identities and rows in memory
///
/// Mirrors the provider's observable behaviour: duplicate identities and
/// duplicate account emails are rejected, `created_at` is stamped on insert.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    tables: RwLock<Tables>,
    create_identity_calls: AtomicUsize,
    fail_usage_writes: AtomicBool,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `create_identity` calls made so far
    pub fn create_identity_calls(&self) -> usize {
        self.create_identity_calls.load(Ordering::SeqCst)
    }

    /// Make subsequent usage inserts fail with a 500
    pub fn fail_usage_writes(&self, fail: bool) {
        self.fail_usage_writes.store(fail, Ordering::SeqCst);
    }

    /// Register an identity without an account row
    pub async fn seed_identity(&self, email: &str, password: &str) -> Identity {
        let id = Uuid::new_v4().to_string();
        self.tables.write().await.identities.insert(
            email.to_string(),
            StoredIdentity {
                id: id.clone(),
                password: password.to_string(),
            },
        );
        Identity {
            id,
            email: Some(email.to_string()),
        }
    }

    /// Drop an account row, leaving its identity in place
    pub async fn remove_account(&self, id: &str) -> Option<Account> {
        self.tables.write().await.accounts.remove(id)
    }

    pub async fn account_count(&self) -> usize {
        self.tables.read().await.accounts.len()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryProvider {
    async fn email_exists(&self, email: &str) -> Result<bool, ProviderError> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().any(|a| a.email == email))
    }

    async fn create_identity(&self, email: &str, password: &str) -> Result<Identity, ProviderError> {
        self.create_identity_calls.fetch_add(1, Ordering::SeqCst);

        let mut tables = self.tables.write().await;
        if tables.identities.contains_key(email) {
            return Err(ProviderError::Status {
                status: 422,
                message: "A user with this email address has already been registered".to_string(),
            });
        }

        let id = Uuid::new_v4().to_string();
        tables.identities.insert(
            email.to_string(),
            StoredIdentity {
                id: id.clone(),
                password: password.to_string(),
            },
        );

        Ok(Identity {
            id,
            email: Some(email.to_string()),
        })
    }

    async fn verify_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Identity>, ProviderError> {
        let tables = self.tables.read().await;
        Ok(tables
            .identities
            .get(email)
            .filter(|stored| stored.password == password)
            .map(|stored| Identity {
                id: stored.id.clone(),
                email: Some(email.to_string()),
            }))
    }

    async fn insert_account(&self, account: &Account) -> Result<(), ProviderError> {
        let mut tables = self.tables.write().await;
        let conflict = tables.accounts.contains_key(&account.id)
            || tables.accounts.values().any(|a| a.email == account.email);
        if conflict {
            return Err(ProviderError::Status {
                status: 409,
                message: "duplicate key value violates unique constraint".to_string(),
            });
        }

        let mut row = account.clone();
        row.created_at
            .get_or_insert_with(|| Utc::now().to_rfc3339());
        tables.accounts.insert(row.id.clone(), row);
        Ok(())
    }

    async fn find_account(&self, id: &str) -> Result<Option<Account>, ProviderError> {
        Ok(self.tables.read().await.accounts.get(id).cloned())
    }

    async fn insert_usage(&self, usage: &UsageRecord) -> Result<(), ProviderError> {
        if self.fail_usage_writes.load(Ordering::SeqCst) {
            return Err(ProviderError::Status {
                status: 500,
                message: "usage table unavailable".to_string(),
            });
        }

        let mut tables = self.tables.write().await;
        let exists = tables.usage.iter().any(|u| {
            u.user_id == usage.user_id && u.month == usage.month && u.year == usage.year
        });
        if exists {
            return Err(ProviderError::Status {
                status: 409,
                message: "duplicate key value violates unique constraint".to_string(),
            });
        }

        tables.usage.push(usage.clone());
        Ok(())
    }

    async fn find_usage(
        &self,
        user_id: &str,
        month: u32,
        year: i32,
    ) -> Result<Option<UsageRecord>, ProviderError> {
        let tables = self.tables.read().await;
        Ok(tables
            .usage
            .iter()
            .find(|u| u.user_id == user_id && u.month == month && u.year == year)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_verify_identity() {
        let provider = InMemoryProvider::new();
        let identity = provider.create_identity("a@x.com", "pw1").await.unwrap();

        let verified = provider.verify_identity("a@x.com", "pw1").await.unwrap();
        assert_eq!(verified.map(|i| i.id), Some(identity.id));

        assert!(provider
            .verify_identity("a@x.com", "wrong")
            .await
            .unwrap()
            .is_none());
        assert_eq!(provider.create_identity_calls(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_identity_rejected() {
        let provider = InMemoryProvider::new();
        provider.create_identity("a@x.com", "pw1").await.unwrap();

        let err = provider.create_identity("a@x.com", "pw2").await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 422, .. }));
    }

    #[tokio::test]
    async fn test_usage_write_failure_switch() {
        let provider = InMemoryProvider::new();
        let usage = UsageRecord::initial("id-1", Utc::now());

        provider.fail_usage_writes(true);
        assert!(provider.insert_usage(&usage).await.is_err());

        provider.fail_usage_writes(false);
        provider.insert_usage(&usage).await.unwrap();
        let found = provider
            .find_usage("id-1", usage.month, usage.year)
            .await
            .unwrap();
        assert_eq!(found, Some(usage));
    }
}
