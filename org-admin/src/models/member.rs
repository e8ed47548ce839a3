use super::organization::Attributes;
use serde::{Deserialize, Serialize};

/// Group reference attached to a member's `membership` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroupRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

/// A realm user seen through one organization: the user exists on its own,
/// membership is a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationMember {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub email_verified: bool,
    /// Member-scoped attributes, distinct from the organization's own.
    #[serde(default)]
    pub organization_member_attributes: Attributes,
    #[serde(default)]
    pub membership: Vec<GroupRef>,
}

impl OrganizationMember {
    /// Case-insensitive match against username or email.
    pub fn matches(&self, search: &str) -> bool {
        let needle = search.to_lowercase();
        self.username.to_lowercase().contains(&needle)
            || self
                .email
                .as_deref()
                .map(|e| e.to_lowercase().contains(&needle))
                .unwrap_or(false)
    }
}

/// Body of a member-attribute update.
#[derive(Debug, Serialize)]
pub(crate) struct MemberAttributesUpdate<'a> {
    pub attributes: &'a Attributes,
}
