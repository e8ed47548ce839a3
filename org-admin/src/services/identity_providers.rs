//! Identity providers: realm-wide listing, linking to organizations, and
//! home-IdP discovery.

use super::admin_client::{rejection, with_query, OrgAdminClient, Payload};
use super::outcome::{Acknowledged, ApiResult, Failure};
use crate::models::{
    enabled_home_idp, IdentityProvider, IdentityProviderLink, LinkIdentityProvider, PageRequest,
};
use reqwest::{Method, StatusCode};

const FETCH_IDPS_FAILED: &str = "Failed to fetch IDPs for org.";

impl OrgAdminClient {
    /// Every identity provider of the realm.
    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn list_identity_providers(
        &self,
        page: &PageRequest,
    ) -> ApiResult<Vec<IdentityProvider>> {
        let url = with_query(
            self.admin_endpoint(&["identity-provider", "instances"]),
            &page.query(),
        )?;
        let mut providers: Vec<IdentityProvider> = self.get_required(&url, FETCH_IDPS_FAILED).await?;
        providers.truncate(page.max as usize);
        Ok(providers)
    }

    /// Identity providers linked to one organization.
    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn list_org_identity_providers(
        &self,
        org_id: &str,
    ) -> ApiResult<Vec<IdentityProvider>> {
        self.get_required(&self.realm_endpoint(&["orgs", org_id, "idps"]), FETCH_IDPS_FAILED)
            .await
    }

    /// The organization's links, with home-IdP discovery decoded.
    pub async fn list_identity_provider_links(
        &self,
        org_id: &str,
    ) -> ApiResult<Vec<IdentityProviderLink>> {
        let providers = self.list_org_identity_providers(org_id).await?;
        Ok(providers.iter().map(|p| p.link_for(org_id)).collect())
    }

    #[tracing::instrument(skip(self, link), fields(realm = %self.realm(), alias = %link.alias))]
    pub async fn link_identity_provider(
        &self,
        org_id: &str,
        link: &LinkIdentityProvider,
    ) -> ApiResult<Acknowledged> {
        let response = self
            .send(
                Method::POST,
                &self.realm_endpoint(&["orgs", org_id, "idps", "link"]),
                Payload::json(link)?,
            )
            .await?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            tracing::info!(org_id = %org_id, "Identity provider already linked");
            return Err(Failure::already_linked());
        }
        if !status.is_success() {
            let failure = rejection(response).await;
            tracing::warn!(detail = %failure.message, "Identity provider link rejected");
            return Err(Failure::rejected(status.as_u16(), "Failed to link IDP to org."));
        }

        Ok(Acknowledged::new(format!("{} updated for this org.", link.alias)))
    }

    #[tracing::instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn unlink_identity_provider(
        &self,
        org_id: &str,
        alias: &str,
    ) -> ApiResult<Acknowledged> {
        let response = self
            .send(
                Method::POST,
                &self.realm_endpoint(&["orgs", org_id, "idps", alias, "unlink"]),
                Payload::Json(serde_json::json!({})),
            )
            .await?;

        let status = response.status();
        if !status.is_success() {
            let failure = rejection(response).await;
            tracing::warn!(detail = %failure.message, "Identity provider unlink rejected");
            return Err(Failure::rejected(
                status.as_u16(),
                "Failed to unlink Identity Provider.",
            ));
        }

        Ok(Acknowledged::new("Unlinked Identity Provider."))
    }

    /// Full replace of the realm-level identity provider.
    #[tracing::instrument(skip(self, provider), fields(realm = %self.realm(), alias = %provider.alias))]
    pub async fn update_identity_provider(
        &self,
        provider: &IdentityProvider,
    ) -> ApiResult<Acknowledged> {
        let response = self
            .send(
                Method::PUT,
                &self.admin_endpoint(&["identity-provider", "instances", &provider.alias]),
                Payload::json(provider)?,
            )
            .await?;
        self.acknowledge(response, format!("{} updated for this org.", provider.label()))
            .await
    }

    /// Update a provider on behalf of an organization, refusing a second
    /// enabled home IdP for that organization.
    pub async fn update_org_identity_provider(
        &self,
        org_id: &str,
        provider: &IdentityProvider,
    ) -> ApiResult<Acknowledged> {
        if provider.link_for(org_id).is_enabled_home_idp() {
            let linked = self.list_org_identity_providers(org_id).await?;
            ensure_single_home_idp(&linked, org_id, provider)?;
        }
        self.update_identity_provider(provider).await
    }

    /// Point home-IdP discovery of the linked provider `alias` at `org_id`
    /// for the given e-mail domains.
    #[tracing::instrument(skip(self, domains), fields(realm = %self.realm(), domains = domains.len()))]
    pub async fn set_home_idp_domains(
        &self,
        org_id: &str,
        alias: &str,
        domains: &[String],
    ) -> ApiResult<Acknowledged> {
        let linked = self.list_org_identity_providers(org_id).await?;
        let provider = linked
            .iter()
            .find(|p| p.alias == alias)
            .ok_or_else(|| Failure::invalid(format!("{} is not linked to this org.", alias)))?
            .with_home_idp(org_id, domains);

        ensure_single_home_idp(&linked, org_id, &provider)?;
        self.update_identity_provider(&provider).await
    }
}

/// At most one enabled home IdP per organization.
fn ensure_single_home_idp(
    linked: &[IdentityProvider],
    org_id: &str,
    provider: &IdentityProvider,
) -> ApiResult<()> {
    if !provider.link_for(org_id).is_enabled_home_idp() {
        return Ok(());
    }

    match enabled_home_idp(linked, org_id, Some(&provider.alias)) {
        Some(current) => {
            tracing::warn!(
                org_id = %org_id,
                alias = %provider.alias,
                current = %current.alias,
                "Second enabled home IdP refused"
            );
            Err(Failure::invalid(format!(
                "{} is already the home identity provider for this org.",
                current.label()
            )))
        }
        None => Ok(()),
    }
}
