//! Configuration management for the ToastSpeech backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: TS__)
//! 4. The legacy variables `SUPABASE_URL`, `SUPABASE_SERVICE_KEY` and `JWT_SECRET_KEY`

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Default token lifetime: 30 minutes
pub const DEFAULT_ACCESS_TOKEN_EXPIRY_SECS: i64 = 30 * 60;

/// Longest accepted token lifetime: 30 days
pub const MAX_ACCESS_TOKEN_EXPIRY_SECS: i64 = 30 * 24 * 60 * 60;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub jwt: JwtConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// External identity/data provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider project, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Service-role key used for admin and data calls
    pub service_key: String,
    /// Per-request timeout for provider calls
    pub timeout_secs: u64,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_secs: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            provider: ProviderConfig {
                url: String::new(),
                service_key: String::new(),
                timeout_secs: 10,
            },
            jwt: JwtConfig {
                secret: "super-secret-key".to_string(),
                access_token_expiry_secs: DEFAULT_ACCESS_TOKEN_EXPIRY_SECS,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with TS__ prefix
    /// 4. Legacy provider/secret variables
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (TS__ prefix)
            // e.g., TS__SERVER__PORT=9000 sets server.port
            .add_source(config::Environment::with_prefix("TS").separator("__"))
            .set_override_option("provider.url", env::var("SUPABASE_URL").ok())?
            .set_override_option("provider.service_key", env::var("SUPABASE_SERVICE_KEY").ok())?
            .set_override_option("jwt.secret", env::var("JWT_SECRET_KEY").ok())?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Reject configurations the server cannot start with
    ///
    /// A missing provider URL or service key is always fatal. In production
    /// the JWT secret must also be at least 32 characters and not the default.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.provider.url.trim().is_empty() {
            errors.push("provider URL is not set (SUPABASE_URL or TS__PROVIDER__URL)");
        }
        if self.provider.service_key.trim().is_empty() {
            errors.push("provider service key is not set (SUPABASE_SERVICE_KEY or TS__PROVIDER__SERVICE_KEY)");
        }
        if self.jwt.access_token_expiry_secs <= 0 {
            errors.push("access token expiry must be positive");
        }
        if self.jwt.access_token_expiry_secs > MAX_ACCESS_TOKEN_EXPIRY_SECS {
            errors.push("access token expiry must not exceed 30 days");
        }
        if Self::is_production()
            && (self.jwt.secret == AppConfig::default().jwt.secret || self.jwt.secret.len() < 32)
        {
            errors.push("JWT secret must be at least 32 characters and not the default");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("Invalid configuration: {}", errors.join("; "))
        }
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}
