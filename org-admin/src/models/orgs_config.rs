use serde::{Deserialize, Serialize};

/// Realm-wide organization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrgsConfig {
    #[serde(default)]
    pub create_admin_user_enabled: bool,
    #[serde(default)]
    pub shared_idps_enabled: bool,
    /// Lifetime of generated portal links, in seconds (server-formatted).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub console_link_expiration: Option<String>,
}

/// Shareable admin-portal link for an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalLink {
    pub link: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub redirect: Option<String>,
}
