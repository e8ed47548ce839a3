use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identity claim of the signed-in console user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoAmI {
    pub user_id: String,
    pub realm: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub create_realm: bool,
    /// Access tags keyed by realm name.
    #[serde(rename = "realm_access", default)]
    pub realm_access: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub temporary: bool,
}

impl WhoAmI {
    pub fn realm_access(&self, realm: &str) -> &[String] {
        self.realm_access
            .get(realm)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
