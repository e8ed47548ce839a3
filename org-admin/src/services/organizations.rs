//! Organization CRUD.

use super::admin_client::{rejection, with_query, OrgAdminClient, Payload};
use super::outcome::{Acknowledged, ApiResult, Failure};
use crate::models::organization::CreateOrganizationRequest;
use crate::models::{NewOrganization, Organization, PageRequest};
use reqwest::Method;
use validator::Validate;

impl OrgAdminClient {
    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn list_organizations(&self, page: &PageRequest) -> ApiResult<Vec<Organization>> {
        let url = with_query(self.realm_endpoint(&["orgs"]), &page.query())?;
        self.get_list(&url, Some(page.max)).await
    }

    #[tracing::instrument(skip(self, organization), fields(realm = %self.realm(), name = %organization.name))]
    pub async fn create_organization(
        &self,
        organization: &NewOrganization,
    ) -> ApiResult<Acknowledged> {
        organization.validate()?;

        let body = Payload::json(&CreateOrganizationRequest {
            organization,
            realm: self.realm(),
        })?;
        let response = self
            .send(Method::POST, &self.realm_endpoint(&["orgs"]), body)
            .await?;

        let ack = self.acknowledge(response, "Org created successfully.").await?;
        tracing::info!("Organization created");
        Ok(ack)
    }

    /// `None` when the organization does not exist or cannot be read.
    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn get_organization(&self, org_id: &str) -> ApiResult<Option<Organization>> {
        self.get_optional(&self.realm_endpoint(&["orgs", org_id])).await
    }

    /// Full replace: callers merge their edits into the fetched organization
    /// before calling.
    #[tracing::instrument(skip(self, organization), fields(realm = %self.realm(), org_id = %organization.id))]
    pub async fn update_organization(&self, organization: &Organization) -> ApiResult<Acknowledged> {
        organization.validate()?;

        let response = self
            .send(
                Method::PUT,
                &self.realm_endpoint(&["orgs", &organization.id]),
                Payload::json(organization)?,
            )
            .await?;

        self.acknowledge(response, "Organization updated.").await
    }

    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn delete_organization(&self, org_id: &str) -> ApiResult<Acknowledged> {
        let response = self
            .send(
                Method::DELETE,
                &self.realm_endpoint(&["orgs", org_id]),
                Payload::Empty,
            )
            .await?;

        if response.status().is_success() {
            tracing::info!(org_id = %org_id, "Organization removed");
            return Ok(Acknowledged::new("Organization removed."));
        }

        let failure = rejection(response).await;
        Err(Failure {
            message: format!("{} could not be removed. ({})", org_id, failure.message),
            ..failure
        })
    }

    /// Organizations the user belongs to.
    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn list_organizations_for_user(&self, user_id: &str) -> ApiResult<Vec<Organization>> {
        self.get_list(&self.realm_endpoint(&["users", user_id, "orgs"]), None)
            .await
    }
}
