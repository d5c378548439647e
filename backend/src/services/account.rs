//! Account orchestration: signup, signin and "who am I"
//!
//! Each operation is a straight sequence of provider calls followed by
//! token issuance. Nothing is cached between requests.

use crate::auth::TokenService;
use crate::error::ApiError;
use crate::provider::IdentityProvider;
use chrono::Utc;
use toastspeech_shared::models::{Account, UsageRecord};
use toastspeech_shared::types::{AccountView, SigninRequest, SignupRequest};
use toastspeech_shared::validation::{self, ValidationError};
use tracing::{error, info, warn};
use validator::Validate;

/// Token plus the account it was issued for
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub account: AccountView,
}

/// Account service for authentication operations
pub struct AccountService;

impl AccountService {
    /// Register a new account
    ///
    /// The duplicate-email check is advisory: two concurrent signups with
    /// the same email can both pass it. The account and usage writes are
    /// not transactional, so a usage failure leaves the account in place.
    pub async fn signup(
        provider: &dyn IdentityProvider,
        tokens: &TokenService,
        req: &SignupRequest,
    ) -> Result<AuthSession, ApiError> {
        validate_request(req)?;
        validation::validate_name(&req.name)
            .map_err(|msg| ApiError::Validation(ValidationError::new("name", &msg)))?;

        if provider.email_exists(&req.email).await? {
            warn!("Signup rejected: email already in use");
            return Err(ApiError::DuplicateEmail);
        }

        let identity = provider
            .create_identity(&req.email, &req.password)
            .await
            .map_err(|e| {
                warn!(error = %e, "Provider did not create an identity");
                ApiError::ProviderAuth
            })?;

        let profile = Account::from_signup(identity.id.clone(), req);
        provider.insert_account(&profile).await?;

        let usage = UsageRecord::initial(identity.id.clone(), Utc::now());
        if let Err(e) = provider.insert_usage(&usage).await {
            error!(account_id = %identity.id, error = %e, "Account created without usage record");
            return Err(e.into());
        }

        let access_token = tokens
            .issue(&identity.id, &req.email)
            .map_err(|e| ApiError::Internal(e.into()))?;

        info!(account_id = %identity.id, "Account created");

        // The provider stamps its own created_at; this one is local
        let mut account = AccountView::from(profile);
        account.created_at = Some(Utc::now().to_rfc3339());

        Ok(AuthSession {
            access_token,
            account,
        })
    }

    /// Sign in with email and password
    pub async fn signin(
        provider: &dyn IdentityProvider,
        tokens: &TokenService,
        req: &SigninRequest,
    ) -> Result<AuthSession, ApiError> {
        validate_request(req)?;

        let identity = provider
            .verify_identity(&req.email, &req.password)
            .await?
            .ok_or_else(|| {
                warn!("Signin rejected: invalid credentials");
                ApiError::InvalidCredentials
            })?;

        let account = provider
            .find_account(&identity.id)
            .await?
            .ok_or_else(|| {
                warn!(account_id = %identity.id, "Identity has no account record");
                ApiError::AccountNotFound
            })?;

        let access_token = tokens
            .issue(&identity.id, &req.email)
            .map_err(|e| ApiError::Internal(e.into()))?;

        info!(account_id = %identity.id, "Signed in");

        Ok(AuthSession {
            access_token,
            account: account.into(),
        })
    }

    /// Resolve a bearer token to its account
    ///
    /// A bad or expired token, a missing account and a failed lookup all
    /// come back as `Unauthenticated`.
    pub async fn who_am_i(
        provider: &dyn IdentityProvider,
        tokens: &TokenService,
        token: &str,
    ) -> Result<AccountView, ApiError> {
        let subject = tokens
            .validate(token)
            .map_err(|_| ApiError::Unauthenticated)?;

        match provider.find_account(&subject).await {
            Ok(Some(account)) => Ok(account.into()),
            Ok(None) => {
                warn!(account_id = %subject, "Token subject has no account");
                Err(ApiError::Unauthenticated)
            }
            Err(e) => {
                warn!(account_id = %subject, error = %e, "Account lookup failed");
                Err(ApiError::Unauthenticated)
            }
        }
    }
}

fn validate_request<T: Validate>(req: &T) -> Result<(), ApiError> {
    req.validate().map_err(|errors| {
        let err = ValidationError::first_of(&errors)
            .unwrap_or_else(|| ValidationError::new("request", "is invalid"));
        ApiError::Validation(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::InMemoryProvider;
    use chrono::Duration;

    fn tokens() -> TokenService {
        TokenService::new("test-secret", 1800)
    }

    fn signup_request(email: &str) -> SignupRequest {
        SignupRequest {
            name: "A".to_string(),
            email: email.to_string(),
            password: "pw1".to_string(),
            gender: None,
            age_group: Some("25-34".to_string()),
            profession: None,
            purposes: Some(vec!["work".to_string(), "weddings".to_string()]),
            custom_purpose: None,
        }
    }

    fn signin_request(email: &str, password: &str) -> SigninRequest {
        SigninRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_then_who_am_i() {
        let provider = InMemoryProvider::new();
        let tokens = tokens();

        let session = AccountService::signup(&provider, &tokens, &signup_request("a@x.com"))
            .await
            .unwrap();
        assert_eq!(session.account.subscription_plan.as_deref(), Some("free"));
        assert_eq!(session.account.subscription_status.as_deref(), Some("active"));
        assert!(session.account.created_at.is_some());

        let me = AccountService::who_am_i(&provider, &tokens, &session.access_token)
            .await
            .unwrap();
        assert_eq!(me.email, "a@x.com");
        assert_eq!(me.id, session.account.id);
        assert_eq!(me.purposes, session.account.purposes);
    }

    #[tokio::test]
    async fn test_signup_writes_initial_usage() {
        let provider = InMemoryProvider::new();
        let session = AccountService::signup(&provider, &tokens(), &signup_request("a@x.com"))
            .await
            .unwrap();

        let now = Utc::now();
        let usage = UsageRecord::initial(session.account.id.clone(), now);
        let stored = provider
            .find_usage(&session.account.id, usage.month, usage.year)
            .await
            .unwrap();
        assert_eq!(stored, Some(usage));
    }

    #[tokio::test]
    async fn test_duplicate_signup_skips_identity_creation() {
        let provider = InMemoryProvider::new();
        let tokens = tokens();

        AccountService::signup(&provider, &tokens, &signup_request("a@x.com"))
            .await
            .unwrap();
        assert_eq!(provider.create_identity_calls(), 1);

        let err = AccountService::signup(&provider, &tokens, &signup_request("a@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DuplicateEmail));
        assert_eq!(provider.create_identity_calls(), 1);
    }

    #[tokio::test]
    async fn test_signup_identity_failure_is_provider_auth_error() {
        let provider = InMemoryProvider::new();
        // Identity exists at the provider but has no account row
        provider.seed_identity("a@x.com", "pw1").await;

        let err = AccountService::signup(&provider, &tokens(), &signup_request("a@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ProviderAuth));
        assert_eq!(provider.account_count().await, 0);
    }

    #[tokio::test]
    async fn test_signup_usage_failure_leaves_account() {
        let provider = InMemoryProvider::new();
        provider.fail_usage_writes(true);

        let err = AccountService::signup(&provider, &tokens(), &signup_request("a@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Provider(_)));
        assert_eq!(provider.account_count().await, 1);
    }

    #[tokio::test]
    async fn test_signup_rejects_invalid_input() {
        let provider = InMemoryProvider::new();

        let mut req = signup_request("not-an-email");
        let err = AccountService::signup(&provider, &tokens(), &req)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref v) if v.field == "email"));

        req = signup_request("a@x.com");
        req.name = "   ".to_string();
        let err = AccountService::signup(&provider, &tokens(), &req)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref v) if v.field == "name"));

        assert_eq!(provider.create_identity_calls(), 0);
    }

    #[tokio::test]
    async fn test_signin_success_returns_stored_account() {
        let provider = InMemoryProvider::new();
        let tokens = tokens();
        let signup = AccountService::signup(&provider, &tokens, &signup_request("a@x.com"))
            .await
            .unwrap();

        let session = AccountService::signin(&provider, &tokens, &signin_request("a@x.com", "pw1"))
            .await
            .unwrap();
        assert_eq!(session.account.id, signup.account.id);
        assert_eq!(tokens.validate(&session.access_token).unwrap(), signup.account.id);
    }

    #[tokio::test]
    async fn test_signin_keeps_provider_created_at_verbatim() {
        let provider = InMemoryProvider::new();
        let tokens = tokens();
        let identity = provider.seed_identity("a@x.com", "pw1").await;

        let mut account = Account::from_signup(identity.id.clone(), &signup_request("a@x.com"));
        account.created_at = Some("2024-03-01T10:15:00.123456".to_string());
        provider.insert_account(&account).await.unwrap();

        let session = AccountService::signin(&provider, &tokens, &signin_request("a@x.com", "pw1"))
            .await
            .unwrap();
        assert_eq!(
            session.account.created_at.as_deref(),
            Some("2024-03-01T10:15:00.123456")
        );

        let me = AccountService::who_am_i(&provider, &tokens, &session.access_token)
            .await
            .unwrap();
        assert_eq!(me.id, identity.id);
    }

    #[tokio::test]
    async fn test_signin_wrong_password() {
        let provider = InMemoryProvider::new();
        let tokens = tokens();
        AccountService::signup(&provider, &tokens, &signup_request("a@x.com"))
            .await
            .unwrap();

        let err = AccountService::signin(&provider, &tokens, &signin_request("a@x.com", "nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_signin_without_account_record() {
        let provider = InMemoryProvider::new();
        provider.seed_identity("ghost@x.com", "pw1").await;

        let err = AccountService::signin(&provider, &tokens(), &signin_request("ghost@x.com", "pw1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AccountNotFound));
    }

    #[tokio::test]
    async fn test_who_am_i_failures_collapse() {
        let provider = InMemoryProvider::new();
        let tokens = tokens();
        let session = AccountService::signup(&provider, &tokens, &signup_request("a@x.com"))
            .await
            .unwrap();

        let expired = tokens
            .issue_with_ttl(&session.account.id, "a@x.com", Duration::seconds(-1))
            .unwrap();
        let orphan = tokens.issue("no-such-account", "b@x.com").unwrap();

        for token in ["garbage", expired.as_str(), orphan.as_str()] {
            let err = AccountService::who_am_i(&provider, &tokens, token)
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::Unauthenticated), "token {token}");
        }
    }

    #[tokio::test]
    async fn test_who_am_i_after_account_removed() {
        let provider = InMemoryProvider::new();
        let tokens = tokens();
        let session = AccountService::signup(&provider, &tokens, &signup_request("a@x.com"))
            .await
            .unwrap();

        provider.remove_account(&session.account.id).await;

        let err = AccountService::who_am_i(&provider, &tokens, &session.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
    }
}
