pub mod access;
pub mod config;
pub mod models;
pub mod services;

pub use access::{AccessContext, Capability, GrantSet};
pub use services::{Acknowledged, ApiResult, Failure, FailureReason, OrgAdminClient};

use config::Settings;

/// The one admin client plus the access grants of the active realm,
/// constructed once at startup and handed to whatever needs them.
#[derive(Clone)]
pub struct ConsoleContext {
    pub client: OrgAdminClient,
    pub access: AccessContext,
}

impl ConsoleContext {
    pub fn new(client: OrgAdminClient) -> Self {
        Self {
            client,
            access: AccessContext::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(OrgAdminClient::from_settings(settings))
    }

    /// Load configuration, install tracing and load the grants of the
    /// configured realm.
    pub async fn bootstrap() -> anyhow::Result<Self> {
        let settings = config::get_configuration().map_err(|e| {
            eprintln!("Failed to read configuration: {}", e);
            anyhow::anyhow!("Configuration error: {}", e)
        })?;

        console_core::observability::init_tracing(
            "org-admin",
            &settings.logging.level,
            settings.logging.otlp_endpoint.as_deref(),
        )?;

        let context = Self::from_settings(&settings);
        context.reload_access().await?;

        tracing::info!(realm = %context.realm(), "Console context ready");
        Ok(context)
    }

    pub fn realm(&self) -> &str {
        self.client.realm()
    }

    /// Re-derive grants for the active realm. False when the identity and
    /// realm are unchanged.
    pub async fn reload_access(&self) -> ApiResult<bool> {
        let who_am_i = self.client.who_am_i().await?;
        Ok(self.access.refresh(&who_am_i, self.client.realm()))
    }

    /// Administer another realm; grants are replaced with that realm's.
    pub async fn switch_realm(&mut self, realm: &str) -> ApiResult<bool> {
        if realm != self.client.realm() {
            tracing::info!(from = %self.client.realm(), to = %realm, "Switching realm");
            self.client = self.client.for_realm(realm);
        }
        self.reload_access().await
    }
}
