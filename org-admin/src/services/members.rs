use super::admin_client::{with_query, OrgAdminClient, Payload};
use super::outcome::{Acknowledged, ApiResult};
use crate::models::member::MemberAttributesUpdate;
use crate::models::{Attributes, OrganizationMember, PageRequest};
use reqwest::Method;

impl OrgAdminClient {
    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn list_members(
        &self,
        org_id: &str,
        page: &PageRequest,
    ) -> ApiResult<Vec<OrganizationMember>> {
        let url = with_query(self.realm_endpoint(&["orgs", org_id, "members"]), &page.query())?;
        self.get_list(&url, Some(page.max)).await
    }

    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn add_member(&self, org_id: &str, user_id: &str) -> ApiResult<Acknowledged> {
        let response = self
            .send(
                Method::PUT,
                &self.realm_endpoint(&["orgs", org_id, "members", user_id]),
                Payload::Empty,
            )
            .await?;
        self.acknowledge(response, "User added to organization.").await
    }

    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn remove_member(&self, org_id: &str, user_id: &str) -> ApiResult<Acknowledged> {
        let response = self
            .send(
                Method::DELETE,
                &self.realm_endpoint(&["orgs", org_id, "members", user_id]),
                Payload::Empty,
            )
            .await?;
        self.acknowledge(response, "User removed from organization.").await
    }

    /// Member-scoped attributes; empty when none are set or the read fails.
    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn get_member_attributes(&self, org_id: &str, user_id: &str) -> ApiResult<Attributes> {
        let url = self.realm_endpoint(&["orgs", org_id, "members", user_id, "attributes"]);
        Ok(self.get_optional(&url).await?.unwrap_or_default())
    }

    #[tracing::instrument(skip(self, attributes), fields(realm = %self.realm(), count = attributes.len()))]
    pub async fn update_member_attributes(
        &self,
        org_id: &str,
        user_id: &str,
        attributes: &Attributes,
    ) -> ApiResult<Acknowledged> {
        let response = self
            .send(
                Method::PUT,
                &self.realm_endpoint(&["orgs", org_id, "members", user_id, "attributes"]),
                Payload::json(&MemberAttributesUpdate { attributes })?,
            )
            .await?;
        self.acknowledge(response, "Member attributes updated.").await
    }
}
