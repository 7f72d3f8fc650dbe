//! Token exchange against the provider token endpoint
//!
//! The callback handler only sees the narrow [`TokenExchanger`] trait, so
//! tests can swap in a fake implementation without a live network
//! dependency. The production implementation performs a single form POST;
//! there is no retry and no token refresh scheduling in this flow.

use crate::models::TokenPair;
use crate::settings::FacilityHubSettings;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Errors surfaced by the token exchange call
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("exchanger misconfigured: {0}")]
    Configuration(String),
    #[error("token endpoint unreachable: {0}")]
    Network(String),
    /// Provider-side rejection, carrying the provider's own error string
    /// verbatim so the redirect `details` parameter stays inspectable.
    #[error("{0}")]
    Provider(String),
    #[error("invalid token response: {0}")]
    InvalidResponse(String),
}

/// Capability consumed by the callback handler: exchange an authorization
/// code for a token pair.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Exchange an authorization code for tokens
    ///
    /// # Errors
    ///
    /// Returns an [`ExchangeError`] on any provider-side or network failure.
    async fn exchange(&self, code: &str) -> Result<TokenPair, ExchangeError>;
}

/// Raw token endpoint response. Providers differ on which optional fields
/// they return; only `access_token` is required.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

/// Error body shape used by the Google-family token endpoints
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// Production exchanger: form POST to the configured token endpoint
pub struct HttpTokenExchanger {
    http_client: reqwest::Client,
    token_endpoint: String,
    client_id: String,
    client_secret: Option<String>,
    redirect_uri: String,
}

impl HttpTokenExchanger {
    /// Build an exchanger from loaded settings
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::Configuration`] if no client ID is configured.
    pub fn from_settings(settings: &FacilityHubSettings) -> Result<Self, ExchangeError> {
        let client_id = settings.oauth.get_client_id().ok_or_else(|| {
            ExchangeError::Configuration("OAuth client_id is not configured".to_string())
        })?;

        Ok(Self {
            http_client: reqwest::Client::new(),
            token_endpoint: settings.oauth.token_endpoint.clone(),
            client_id,
            client_secret: settings.oauth.get_client_secret(),
            redirect_uri: settings.get_callback_url(),
        })
    }

    /// Translate a non-success token endpoint response into a provider error,
    /// preferring the structured `error` field when the body parses.
    fn provider_error(status: reqwest::StatusCode, body: &str) -> ExchangeError {
        match serde_json::from_str::<TokenErrorResponse>(body) {
            Ok(parsed) => {
                log::debug!(
                    "token endpoint error: {} ({})",
                    parsed.error,
                    parsed.error_description.as_deref().unwrap_or("no description")
                );
                ExchangeError::Provider(parsed.error)
            }
            Err(_) => ExchangeError::Provider(format!("status {status}: {body}")),
        }
    }
}

#[async_trait]
impl TokenExchanger for HttpTokenExchanger {
    async fn exchange(&self, code: &str) -> Result<TokenPair, ExchangeError> {
        let mut params = HashMap::new();
        params.insert("grant_type", "authorization_code");
        params.insert("code", code);
        params.insert("redirect_uri", &self.redirect_uri);
        params.insert("client_id", &self.client_id);
        if let Some(ref secret) = self.client_secret {
            params.insert("client_secret", secret);
        }

        log::debug!("exchanging authorization code at {}", self.token_endpoint);
        let response = self
            .http_client
            .post(&self.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(Self::provider_error(status, &body));
        }

        let token_response: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| ExchangeError::InvalidResponse(e.to_string()))?;

        Ok(TokenPair {
            access_token: token_response.access_token,
            refresh_token: token_response.refresh_token,
            // Providers occasionally omit expires_in; assume one hour.
            expires_in: token_response.expires_in.unwrap_or(3600),
        })
    }
}
