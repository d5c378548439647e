//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! Everything here is built once at startup and is read-only afterwards.

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::provider::IdentityProvider;
use std::sync::Arc;

/// Shared application state
///
/// All fields are cheap to clone across async tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized token service with cached keys
    pub tokens: TokenService,
    /// External identity/data provider
    pub provider: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// Create a new application state
    ///
    /// Pre-computes the signing keys from the config secret, so call this
    /// once at startup.
    pub fn new(provider: Arc<dyn IdentityProvider>, config: AppConfig) -> Self {
        let tokens = TokenService::new(&config.jwt.secret, config.jwt.access_token_expiry_secs);

        Self {
            config: Arc::new(config),
            tokens,
            provider,
        }
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the token service
    #[inline]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Get a reference to the provider
    #[inline]
    pub fn provider(&self) -> &dyn IdentityProvider {
        self.provider.as_ref()
    }
}
