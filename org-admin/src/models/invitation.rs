use serde::{Deserialize, Serialize};
use validator::Validate;

/// Pending invitation to join an organization. Immutable; cancel = delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub inviter_id: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
}

/// Request to invite someone by e-mail.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewInvitation {
    #[validate(email(message = "A valid e-mail address is required"))]
    pub email: String,
    /// Whether the server sends the invitation e-mail.
    pub send: bool,
    pub redirect_uri: String,
}

impl NewInvitation {
    pub fn new(email: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            send: true,
            redirect_uri: redirect_uri.into(),
        }
    }
}
