//! Bearer-token sources for admin-API calls.
//!
//! Caching and renewal are the provider's job; the resource client asks for
//! a token before every request.

use super::outcome::{error_message, ApiResult, Failure};
use crate::config::CredentialSettings;
use async_trait::async_trait;
use console_core::observability::TracedRequestExt;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Renew this long before the server-side expiry.
const EXPIRY_SKEW: Duration = Duration::from_secs(30);

#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> ApiResult<Secret<String>>;
}

/// Fixed token, e.g. one handed over by an embedding application.
pub struct StaticTokenProvider {
    token: Secret<String>,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Secret::new(token.into()),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> ApiResult<Secret<String>> {
        if self.token.expose_secret().is_empty() {
            return Err(Failure::token("No access token configured"));
        }
        Ok(self.token.clone())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    60
}

struct CachedToken {
    token: Secret<String>,
    refresh_at: Instant,
}

/// OAuth2 client-credentials grant against the realm token endpoint.
pub struct ClientCredentialsTokenProvider {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: Secret<String>,
    cached: RwLock<Option<CachedToken>>,
}

impl ClientCredentialsTokenProvider {
    pub fn new(
        client: Client,
        server_base_url: &str,
        token_realm: &str,
        client_id: impl Into<String>,
        client_secret: Secret<String>,
    ) -> Self {
        let token_url = format!(
            "{}/realms/{}/protocol/openid-connect/token",
            server_base_url.trim_end_matches('/'),
            urlencoding::encode(token_realm)
        );

        tracing::info!(token_url = %token_url, "Client-credentials token provider configured");

        Self {
            client,
            token_url,
            client_id: client_id.into(),
            client_secret,
            cached: RwLock::new(None),
        }
    }

    async fn request_token(&self) -> ApiResult<CachedToken> {
        let response = self
            .client
            .post(&self.token_url)
            .traced()
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose_secret().as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, token_url = %self.token_url, "Token request failed");
                Failure::token(format!("Token request failed: {}", e))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Failure::token(format!("Token response unreadable: {}", e)))?;

        if !status.is_success() {
            tracing::warn!(status = %status, client_id = %self.client_id, "Token endpoint refused credentials");
            return Err(Failure::token(format!(
                "Token endpoint returned {}: {}",
                status.as_u16(),
                error_message(&body)
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| Failure::token(format!("Malformed token response: {}", e)))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_SKEW);
        tracing::debug!(expires_in = token.expires_in, "Access token obtained");

        Ok(CachedToken {
            token: Secret::new(token.access_token),
            refresh_at: Instant::now() + lifetime,
        })
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsTokenProvider {
    async fn access_token(&self) -> ApiResult<Secret<String>> {
        {
            let guard = self.cached.read().await;
            if let Some(cached) = guard.as_ref() {
                if Instant::now() < cached.refresh_at {
                    return Ok(cached.token.clone());
                }
            }
        }

        let mut guard = self.cached.write().await;

        // Another task may have renewed while we waited
        if let Some(cached) = guard.as_ref() {
            if Instant::now() < cached.refresh_at {
                return Ok(cached.token.clone());
            }
        }

        let fresh = self.request_token().await?;
        let token = fresh.token.clone();
        *guard = Some(fresh);
        Ok(token)
    }
}

/// Build the provider described by `credentials`.
pub fn token_provider_from_settings(
    client: Client,
    server_base_url: &str,
    credentials: &CredentialSettings,
) -> Arc<dyn TokenProvider> {
    match credentials {
        CredentialSettings::Static { token } => Arc::new(StaticTokenProvider {
            token: token.clone(),
        }),
        CredentialSettings::ClientCredentials {
            token_realm,
            client_id,
            client_secret,
        } => Arc::new(ClientCredentialsTokenProvider::new(
            client,
            server_base_url,
            token_realm,
            client_id.clone(),
            client_secret.clone(),
        )),
    }
}
