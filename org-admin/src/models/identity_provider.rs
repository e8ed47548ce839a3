//! Identity providers and their link to an organization.
//!
//! Home-IdP discovery is stored by the server inside the provider's
//! string config. It is decoded here once into [`HomeIdpDiscovery`] and
//! encoded back only when writing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const HOME_IDP_ORG_KEY: &str = "home.idp.discovery.org";
pub const HOME_IDP_DOMAINS_KEY: &str = "home.idp.discovery.domains";
pub const SYNC_MODE_KEY: &str = "syncMode";

/// Separator used by the server for multi-valued config strings.
const LIST_SEPARATOR: &str = "##";

/// How brokered user data is synchronized on login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncMode {
    Force,
    #[default]
    Import,
    Legacy,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::Force => "FORCE",
            SyncMode::Import => "IMPORT",
            SyncMode::Legacy => "LEGACY",
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FORCE" => Ok(SyncMode::Force),
            "IMPORT" => Ok(SyncMode::Import),
            "LEGACY" => Ok(SyncMode::Legacy),
            other => Err(format!("unknown sync mode: {}", other)),
        }
    }
}

/// Identity provider instance as returned by the admin API.
///
/// Unknown fields are kept in `extra` so a full-replace update does not drop
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProvider {
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_broker_login_flow_alias: Option<String>,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Home-IdP discovery settings of one link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HomeIdpDiscovery {
    pub enabled: bool,
    pub domains: Vec<String>,
}

/// Relation between an organization and an identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProviderLink {
    pub organization_id: String,
    pub alias: String,
    pub sync_mode: Option<SyncMode>,
    pub post_broker_login_flow_alias: Option<String>,
    pub home_idp: Option<HomeIdpDiscovery>,
}

impl IdentityProviderLink {
    pub fn is_enabled_home_idp(&self) -> bool {
        self.home_idp.as_ref().map(|h| h.enabled).unwrap_or(false)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl IdentityProvider {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.alias)
    }

    pub fn sync_mode(&self) -> Option<SyncMode> {
        self.config.get(SYNC_MODE_KEY).and_then(|v| v.parse().ok())
    }

    /// Decoded home-IdP discovery for `organization_id`, if this provider is
    /// configured as that organization's home IdP.
    pub fn home_idp_for(&self, organization_id: &str) -> Option<HomeIdpDiscovery> {
        let orgs = self.config.get(HOME_IDP_ORG_KEY).map(|v| split_list(v))?;
        if !orgs.iter().any(|o| o == organization_id) {
            return None;
        }

        Some(HomeIdpDiscovery {
            enabled: self.enabled,
            domains: self
                .config
                .get(HOME_IDP_DOMAINS_KEY)
                .map(|v| split_list(v))
                .unwrap_or_default(),
        })
    }

    pub fn link_for(&self, organization_id: &str) -> IdentityProviderLink {
        IdentityProviderLink {
            organization_id: organization_id.to_string(),
            alias: self.alias.clone(),
            sync_mode: self.sync_mode(),
            post_broker_login_flow_alias: self.post_broker_login_flow_alias.clone(),
            home_idp: self.home_idp_for(organization_id),
        }
    }

    /// Copy with `organization_id` added to the home-IdP organizations and
    /// the discovery domains replaced by `domains`. Organizations already
    /// listed are kept.
    pub fn with_home_idp(&self, organization_id: &str, domains: &[String]) -> Self {
        let mut orgs = self
            .config
            .get(HOME_IDP_ORG_KEY)
            .map(|v| split_list(v))
            .unwrap_or_default();
        if !orgs.iter().any(|o| o == organization_id) {
            orgs.push(organization_id.to_string());
        }

        let mut updated = self.clone();
        updated
            .config
            .insert(HOME_IDP_ORG_KEY.to_string(), orgs.join(LIST_SEPARATOR));
        updated.config.insert(
            HOME_IDP_DOMAINS_KEY.to_string(),
            domains
                .iter()
                .map(|d| d.trim())
                .filter(|d| !d.is_empty())
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR),
        );
        updated
    }
}

/// The provider, other than `except_alias`, currently acting as the enabled
/// home IdP of `organization_id`.
pub fn enabled_home_idp<'a>(
    providers: &'a [IdentityProvider],
    organization_id: &str,
    except_alias: Option<&str>,
) -> Option<&'a IdentityProvider> {
    providers
        .iter()
        .filter(|p| Some(p.alias.as_str()) != except_alias)
        .find(|p| p.link_for(organization_id).is_enabled_home_idp())
}

/// Body of the link call.
#[derive(Debug, Clone, Serialize)]
pub struct LinkIdentityProvider {
    pub alias: String,
    #[serde(rename = "post_broker_flow", skip_serializing_if = "Option::is_none")]
    pub post_broker_login_flow_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_mode: Option<SyncMode>,
}

impl LinkIdentityProvider {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            post_broker_login_flow_alias: None,
            sync_mode: None,
        }
    }

    pub fn sync_mode(mut self, mode: SyncMode) -> Self {
        self.sync_mode = Some(mode);
        self
    }

    pub fn post_broker_flow(mut self, flow_alias: impl Into<String>) -> Self {
        self.post_broker_login_flow_alias = Some(flow_alias.into());
        self
    }
}
