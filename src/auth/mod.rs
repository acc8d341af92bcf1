//! Shared-secret request authorization.
//!
//! The authorizer knows nothing about HTTP routing: it receives the request
//! headers, asks its [`CredentialExtractor`] for the presented credential and
//! compares it with the expected secret. Route exemptions live in the router.

use axum::http::{HeaderMap, HeaderName};
use thiserror::Error;

use crate::config::{ConfigError, SecurityConfig};
use crate::error::ApiError;

/// Message returned for every rejected request
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized. Invalid API key.";

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing credential")]
    Missing,

    #[error("invalid credential")]
    Invalid,
}

impl From<AuthError> for ApiError {
    fn from(_: AuthError) -> Self {
        // Missing and wrong keys are indistinguishable to the client
        ApiError::unauthorized(UNAUTHORIZED_MESSAGE)
    }
}

/// Pulls the presented credential out of a request
pub trait CredentialExtractor: Send + Sync {
    fn extract<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str>;
}

/// Credential carried verbatim in a single header
#[derive(Debug, Clone)]
pub struct HeaderCredential {
    header: HeaderName,
}

impl HeaderCredential {
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }

    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        HeaderName::from_bytes(name.as_bytes())
            .map(Self::new)
            .map_err(|_| ConfigError::InvalidHeaderName(name.to_string()))
    }
}

impl CredentialExtractor for HeaderCredential {
    fn extract<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers.get(&self.header).and_then(|v| v.to_str().ok())
    }
}

pub struct ApiKeyAuthorizer {
    expected: String,
    extractor: Box<dyn CredentialExtractor>,
}

impl ApiKeyAuthorizer {
    pub fn new(expected: impl Into<String>, extractor: impl CredentialExtractor + 'static) -> Self {
        Self {
            expected: expected.into(),
            extractor: Box::new(extractor),
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, ConfigError> {
        if security.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        let extractor = HeaderCredential::parse(&security.api_key_header)?;
        Ok(Self::new(security.api_key.clone(), extractor))
    }

    /// Admit the request only when the presented credential equals the secret exactly
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let provided = self.extractor.extract(headers).ok_or(AuthError::Missing)?;
        if provided == self.expected {
            Ok(())
        } else {
            Err(AuthError::Invalid)
        }
    }
}

impl std::fmt::Debug for ApiKeyAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuthorizer").field("expected", &"<redacted>").finish()
    }
}
