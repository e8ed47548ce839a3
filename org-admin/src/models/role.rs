use serde::{Deserialize, Serialize};
use validator::Validate;

/// Role scoped to one organization. The name is its key and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrgRole {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Role name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl OrgRole {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
        }
    }
}
