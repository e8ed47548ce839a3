//! Invitations are immutable: create or cancel (delete), never update.

use super::admin_client::{OrgAdminClient, Payload};
use super::outcome::{Acknowledged, ApiResult};
use crate::models::{Invitation, NewInvitation};
use reqwest::Method;
use validator::Validate;

impl OrgAdminClient {
    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn list_invitations(&self, org_id: &str) -> ApiResult<Vec<Invitation>> {
        self.get_list(&self.realm_endpoint(&["orgs", org_id, "invitations"]), None)
            .await
    }

    #[tracing::instrument(skip(self, invitation), fields(realm = %self.realm(), send = invitation.send))]
    pub async fn create_invitation(
        &self,
        org_id: &str,
        invitation: &NewInvitation,
    ) -> ApiResult<Acknowledged> {
        invitation.validate()?;

        let response = self
            .send(
                Method::POST,
                &self.realm_endpoint(&["orgs", org_id, "invitations"]),
                Payload::json(invitation)?,
            )
            .await?;
        self.acknowledge(response, format!("Invitation created for {}.", invitation.email))
            .await
    }

    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn delete_invitation(
        &self,
        org_id: &str,
        invitation_id: &str,
    ) -> ApiResult<Acknowledged> {
        let response = self
            .send(
                Method::DELETE,
                &self.realm_endpoint(&["orgs", org_id, "invitations", invitation_id]),
                Payload::Empty,
            )
            .await?;
        self.acknowledge(response, "Invitation cancelled.").await
    }
}
