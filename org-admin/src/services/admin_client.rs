//! Authenticated client for the realm-scoped organization admin API.
//!
//! Every request obtains a bearer token first, carries trace context and is
//! normalized into [`ApiResult`]. The per-resource operations live in the
//! sibling modules as further `impl OrgAdminClient` blocks.

use super::outcome::{error_message, Acknowledged, ApiResult, Failure};
use super::token_provider::{token_provider_from_settings, TokenProvider};
use crate::config::{AdminApiSettings, Settings};
use console_core::observability::TracedRequestExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Request body variants used by the admin API.
pub(crate) enum Payload {
    Empty,
    Json(serde_json::Value),
    /// Pre-encoded `application/x-www-form-urlencoded` body.
    Form(String),
}

impl Payload {
    pub(crate) fn json<T: Serialize + ?Sized>(body: &T) -> ApiResult<Self> {
        serde_json::to_value(body)
            .map(Payload::Json)
            .map_err(|e| Failure::invalid(format!("Request body could not be encoded: {}", e)))
    }

    pub(crate) fn form<T: Serialize + ?Sized>(body: &T) -> ApiResult<Self> {
        serde_urlencoded::to_string(body)
            .map(Payload::Form)
            .map_err(|e| Failure::invalid(format!("Form body could not be encoded: {}", e)))
    }
}

/// Client for one realm. Cheap to clone; clones share the HTTP pool and the
/// token provider.
#[derive(Clone)]
pub struct OrgAdminClient {
    client: Client,
    settings: AdminApiSettings,
    tokens: Arc<dyn TokenProvider>,
}

impl OrgAdminClient {
    pub fn new(settings: AdminApiSettings, tokens: Arc<dyn TokenProvider>) -> Self {
        Self::with_http_client(Client::new(), settings, tokens)
    }

    pub fn with_http_client(
        client: Client,
        settings: AdminApiSettings,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            client,
            settings,
            tokens,
        }
    }

    /// Client and token provider as described by the loaded settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let client = Client::new();
        let tokens = token_provider_from_settings(
            client.clone(),
            &settings.admin_api.server_base_url,
            &settings.credentials,
        );
        Self::with_http_client(client, settings.admin_api.clone(), tokens)
    }

    pub fn realm(&self) -> &str {
        &self.settings.realm
    }

    pub fn settings(&self) -> &AdminApiSettings {
        &self.settings
    }

    /// Same connection pool and credentials, scoped to another realm.
    pub fn for_realm(&self, realm: &str) -> Self {
        Self {
            client: self.client.clone(),
            settings: self.settings.for_realm(realm),
            tokens: self.tokens.clone(),
        }
    }

    /// `{server}/realms/{realm}/{segments..}` with each segment escaped.
    pub(crate) fn realm_endpoint(&self, segments: &[&str]) -> String {
        join_segments(self.settings.realm_url(), segments)
    }

    /// `{server}/admin/realms/{realm}/{segments..}` with each segment escaped.
    pub(crate) fn admin_endpoint(&self, segments: &[&str]) -> String {
        join_segments(self.settings.admin_url(), segments)
    }

    /// `{server}/{segments..}`, for endpoints outside the realm trees.
    pub(crate) fn server_endpoint(&self, segments: &[&str]) -> String {
        join_segments(
            self.settings.server_base_url.trim_end_matches('/').to_string(),
            segments,
        )
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        url: &str,
        payload: Payload,
    ) -> ApiResult<Response> {
        let token = self.tokens.access_token().await?;
        let request_id = Uuid::new_v4().to_string();

        tracing::debug!(method = %method, url = %url, request_id = %request_id, "Admin API request");

        let request = self
            .client
            .request(method.clone(), url)
            .bearer_auth(token.expose_secret())
            .header(ACCEPT, "application/json")
            .traced_with_request_id(&request_id);

        let request = match payload {
            Payload::Empty => request,
            Payload::Json(body) => request.json(&body),
            Payload::Form(body) => request
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body),
        };

        request.send().await.map_err(|e| {
            tracing::error!(
                method = %method,
                url = %url,
                request_id = %request_id,
                error = %e,
                "Admin API request failed"
            );
            Failure::transport(format!("Request to the admin API failed: {}", e))
        })
    }

    /// GET a list. Non-2xx and unreadable bodies degrade to an empty list;
    /// `max` caps what is returned.
    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        url: &str,
        max: Option<u32>,
    ) -> ApiResult<Vec<T>> {
        let response = self.send(Method::GET, url, Payload::Empty).await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(status = %status, url = %url, "List request rejected, returning no data");
            return Ok(Vec::new());
        }

        let mut items: Vec<T> = match response.json().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Unreadable list response, returning no data");
                return Ok(Vec::new());
            }
        };

        if let Some(max) = max {
            items.truncate(max as usize);
        }
        Ok(items)
    }

    /// GET a single resource. Any non-2xx or unreadable body is `None`.
    pub(crate) async fn get_optional<T: DeserializeOwned>(&self, url: &str) -> ApiResult<Option<T>> {
        let response = self.send(Method::GET, url, Payload::Empty).await?;
        let status = response.status();

        if !status.is_success() {
            if status != StatusCode::NOT_FOUND {
                tracing::warn!(status = %status, url = %url, "Resource request rejected");
            }
            return Ok(None);
        }

        match response.json().await {
            Ok(resource) => Ok(Some(resource)),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Unreadable resource response");
                Ok(None)
            }
        }
    }

    /// GET where a rejection is a failure carrying `on_reject`.
    pub(crate) async fn get_required<T: DeserializeOwned>(
        &self,
        url: &str,
        on_reject: &str,
    ) -> ApiResult<T> {
        let response = self.send(Method::GET, url, Payload::Empty).await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(status = %status, url = %url, "Required resource request rejected");
            return Err(Failure::rejected(status.as_u16(), on_reject));
        }

        response.json().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Unreadable response body");
            Failure::decode(format!("Unexpected response from the admin API: {}", e))
        })
    }

    /// Acknowledge a 2xx write with `success`, otherwise turn the body into
    /// a failure.
    pub(crate) async fn acknowledge(
        &self,
        response: Response,
        success: impl Into<String>,
    ) -> ApiResult<Acknowledged> {
        if response.status().is_success() {
            return Ok(Acknowledged::new(success));
        }
        Err(rejection(response).await)
    }
}

/// Failure for a non-2xx response, with the message taken from the body.
pub(crate) async fn rejection(response: Response) -> Failure {
    let status = response.status();
    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();

    let mut message = error_message(&body);
    if message.is_empty() {
        message = format!(
            "Request failed: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )
        .trim_end()
        .to_string();
    }

    tracing::warn!(status = %status, url = %url, message = %message, "Admin API rejected request");
    Failure::rejected(status.as_u16(), message)
}

/// Append a query string built from `pairs`.
pub(crate) fn with_query(url: String, pairs: &[(&str, String)]) -> ApiResult<String> {
    if pairs.is_empty() {
        return Ok(url);
    }
    let query = serde_urlencoded::to_string(pairs)
        .map_err(|e| Failure::invalid(format!("Query could not be encoded: {}", e)))?;
    Ok(format!("{}?{}", url, query))
}

fn join_segments(mut base: String, segments: &[&str]) -> String {
    for segment in segments {
        base.push('/');
        base.push_str(&urlencoding::encode(segment));
    }
    base
}
