//! Organization roles and the role-to-user relation.
//!
//! Roles are addressed by name, which cannot change after creation.

use super::admin_client::{rejection, OrgAdminClient, Payload};
use super::outcome::{Acknowledged, ApiResult};
use crate::models::OrgRole;
use reqwest::{Method, StatusCode};
use validator::Validate;

impl OrgAdminClient {
    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn list_roles(&self, org_id: &str) -> ApiResult<Vec<OrgRole>> {
        self.get_list(&self.realm_endpoint(&["orgs", org_id, "roles"]), None)
            .await
    }

    #[tracing::instrument(skip(self, role), fields(realm = %self.realm(), role = %role.name))]
    pub async fn create_role(&self, org_id: &str, role: &OrgRole) -> ApiResult<Acknowledged> {
        role.validate()?;

        let response = self
            .send(
                Method::POST,
                &self.realm_endpoint(&["orgs", org_id, "roles"]),
                Payload::json(role)?,
            )
            .await?;
        self.acknowledge(response, format!("{} added to Organization.", role.name))
            .await
    }

    /// Only the description is mutable.
    #[tracing::instrument(skip(self, role), fields(realm = %self.realm(), role = %role.name))]
    pub async fn update_role(&self, org_id: &str, role: &OrgRole) -> ApiResult<Acknowledged> {
        role.validate()?;

        let response = self
            .send(
                Method::PUT,
                &self.realm_endpoint(&["orgs", org_id, "roles", &role.name]),
                Payload::json(role)?,
            )
            .await?;
        self.acknowledge(response, format!("{} updated.", role.name))
            .await
    }

    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn delete_role(&self, org_id: &str, role_name: &str) -> ApiResult<Acknowledged> {
        let response = self
            .send(
                Method::DELETE,
                &self.realm_endpoint(&["orgs", org_id, "roles", role_name]),
                Payload::Empty,
            )
            .await?;
        self.acknowledge(response, format!("{} removed from Organization.", role_name))
            .await
    }

    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn grant_role(
        &self,
        org_id: &str,
        role_name: &str,
        user_id: &str,
    ) -> ApiResult<Acknowledged> {
        let response = self
            .send(
                Method::PUT,
                &self.realm_endpoint(&["orgs", org_id, "roles", role_name, "users", user_id]),
                Payload::Json(serde_json::json!({})),
            )
            .await?;
        self.acknowledge(response, format!("{} assigned to user.", role_name))
            .await
    }

    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn revoke_role(
        &self,
        org_id: &str,
        role_name: &str,
        user_id: &str,
    ) -> ApiResult<Acknowledged> {
        let response = self
            .send(
                Method::DELETE,
                &self.realm_endpoint(&["orgs", org_id, "roles", role_name, "users", user_id]),
                Payload::Empty,
            )
            .await?;
        self.acknowledge(response, format!("{} revoked for user.", role_name))
            .await
    }

    /// Whether the user holds the role. A 404 means "no"; any other
    /// rejection is a failure.
    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn check_role(&self, org_id: &str, role_name: &str, user_id: &str) -> ApiResult<bool> {
        let response = self
            .send(
                Method::GET,
                &self.realm_endpoint(&["orgs", org_id, "roles", role_name, "users", user_id]),
                Payload::Empty,
            )
            .await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(rejection(response).await),
        }
    }

    /// Roles the user holds in one organization.
    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn list_roles_for_user(&self, org_id: &str, user_id: &str) -> ApiResult<Vec<OrgRole>> {
        self.get_required(
            &self.realm_endpoint(&["users", user_id, "orgs", org_id, "roles"]),
            "Failed to fetch organization roles for user.",
        )
        .await
    }
}
