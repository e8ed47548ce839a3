//! Realm-wide organization settings, portal links and the signed-in
//! principal.

use super::admin_client::{rejection, with_query, OrgAdminClient, Payload};
use super::outcome::{Acknowledged, ApiResult, Failure};
use crate::models::{OrgsConfig, PortalLink, WhoAmI};
use reqwest::Method;

impl OrgAdminClient {
    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn get_orgs_config(&self) -> ApiResult<OrgsConfig> {
        self.get_required(
            &self.realm_endpoint(&["orgs", "config"]),
            "Failed to fetch orgs config.",
        )
        .await
    }

    #[tracing::instrument(skip(self, config), fields(realm = %self.realm()))]
    pub async fn update_orgs_config(&self, config: &OrgsConfig) -> ApiResult<Acknowledged> {
        let response = self
            .send(
                Method::PUT,
                &self.realm_endpoint(&["orgs", "config"]),
                Payload::json(config)?,
            )
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Organizations config update rejected");
            return Err(Failure::rejected(
                status.as_u16(),
                "Failed to update organizations config.",
            ));
        }

        Ok(Acknowledged::new("Organizations config updated."))
    }

    /// Shareable portal link for the organization, optionally bound to a
    /// user. The only form-encoded call of the API.
    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn get_portal_link(&self, org_id: &str, user_id: Option<&str>) -> ApiResult<PortalLink> {
        let form = Payload::form(&[("userId", user_id.unwrap_or_default())])?;
        let response = self
            .send(
                Method::POST,
                &self.realm_endpoint(&["orgs", org_id, "portal-link"]),
                form,
            )
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| Failure::decode(format!("Unexpected portal link response: {}", e)))
    }

    /// The signed-in principal and its per-realm grants.
    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn who_am_i(&self) -> ApiResult<WhoAmI> {
        let url = with_query(
            self.server_endpoint(&[
                "admin",
                &self.settings().login_realm,
                "console",
                "whoami",
            ]),
            &[("currentRealm", self.realm().to_string())],
        )?;
        self.get_required(&url, "Failed to load the signed-in user.")
            .await
    }
}
