use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

use crate::types::IdPolicy;

/// Key used when running in development without `API_KEY` set
pub const DEV_API_KEY: &str = "dev-api-key";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Shared secret every protected request must present
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Header carrying the secret
    pub api_key_header: String,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub id_policy: IdPolicy,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API_KEY must be set outside development")]
    MissingApiKey,

    #[error("invalid api key header name: {0}")]
    InvalidHeaderName(String),
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("SERVER_ENABLE_REQUEST_LOGGING") {
            self.server.enable_request_logging = v.parse().unwrap_or(self.server.enable_request_logging);
        }

        // Security overrides
        if let Ok(v) = env::var("API_KEY") {
            self.security.api_key = v;
        }
        if let Ok(v) = env::var("API_KEY_HEADER") {
            self.security.api_key_header = v.trim().to_ascii_lowercase();
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Store overrides
        if let Ok(v) = env::var("STORE_ID_POLICY") {
            match IdPolicy::parse(&v) {
                Some(policy) => self.store.id_policy = policy,
                None => tracing::warn!("Ignoring unknown STORE_ID_POLICY '{}'", v),
            }
        }

        self
    }

    /// Check the settings that cannot be defaulted safely
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        axum::http::HeaderName::from_bytes(self.security.api_key_header.as_bytes())
            .map_err(|_| ConfigError::InvalidHeaderName(self.security.api_key_header.clone()))?;
        Ok(())
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.security.api_key = api_key.into();
        self
    }

    pub fn with_id_policy(mut self, id_policy: IdPolicy) -> Self {
        self.store.id_policy = id_policy;
        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                api_key: DEV_API_KEY.to_string(),
                api_key_header: "api_key".to_string(),
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
            store: StoreConfig {
                id_policy: IdPolicy::LengthPlusOne,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                api_key: String::new(),
                api_key_header: "api_key".to_string(),
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            store: StoreConfig {
                id_policy: IdPolicy::Monotonic,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                api_key: String::new(),
                api_key_header: "api_key".to_string(),
                enable_cors: false,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            store: StoreConfig {
                id_policy: IdPolicy::Monotonic,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}
