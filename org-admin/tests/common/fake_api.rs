//! In-process stand-in for the organization admin API.
//!
//! Keeps realm state in memory and answers with the status codes and error
//! bodies the real server uses, so round-trip scenarios can be exercised
//! end to end.

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Form, Json, Router,
};
use org_admin::models::{
    Attributes, IdentityProvider, Invitation, OrgRole, Organization, OrganizationMember,
    OrgsConfig, WhoAmI,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const TEST_TOKEN: &str = "test-admin-token";
/// Realm the test administrator signs in to.
pub const LOGIN_REALM: &str = "master";

/// Everything the fake server knows.
#[derive(Default)]
pub struct AdminStore {
    pub orgs: BTreeMap<String, Organization>,
    pub users: BTreeMap<String, OrganizationMember>,
    /// (org, user)
    pub memberships: BTreeSet<(String, String)>,
    pub member_attributes: BTreeMap<(String, String), Attributes>,
    pub invitations: BTreeMap<String, Vec<Invitation>>,
    pub roles: BTreeMap<String, Vec<OrgRole>>,
    /// (org, role, user)
    pub role_grants: BTreeSet<(String, String, String)>,
    pub identity_providers: BTreeMap<String, IdentityProvider>,
    /// (org, alias)
    pub idp_links: BTreeSet<(String, String)>,
    pub orgs_config: OrgsConfig,
    pub who_am_i: Option<WhoAmI>,
}

pub type SharedStore = Arc<Mutex<AdminStore>>;

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn not_found(what: &str) -> Response {
    error(StatusCode::NOT_FOUND, &format!("{} not found", what))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    first: Option<usize>,
    max: Option<usize>,
    search: Option<String>,
}

impl PageQuery {
    fn page<T>(&self, items: impl Iterator<Item = T>) -> Vec<T> {
        items
            .skip(self.first.unwrap_or(0))
            .take(self.max.unwrap_or(100))
            .collect()
    }

    fn needle(&self) -> Option<String> {
        self.search
            .as_ref()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase())
    }
}

async fn require_bearer(request: Request, next: Next) -> Response {
    let expected = format!("Bearer {}", TEST_TOKEN);
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == expected)
        .unwrap_or(false);

    if !authorized {
        return error(StatusCode::UNAUTHORIZED, "HTTP 401 Unauthorized");
    }
    next.run(request).await
}

pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/realms/:realm/orgs", get(list_orgs).post(create_org))
        .route(
            "/realms/:realm/orgs/config",
            get(get_orgs_config).put(update_orgs_config),
        )
        .route(
            "/realms/:realm/orgs/:org_id",
            get(get_org).put(update_org).delete(delete_org),
        )
        .route("/realms/:realm/orgs/:org_id/members", get(list_members))
        .route(
            "/realms/:realm/orgs/:org_id/members/:user_id",
            put(add_member).delete(remove_member),
        )
        .route(
            "/realms/:realm/orgs/:org_id/members/:user_id/attributes",
            get(get_member_attributes).put(update_member_attributes),
        )
        .route(
            "/realms/:realm/orgs/:org_id/invitations",
            get(list_invitations).post(create_invitation),
        )
        .route(
            "/realms/:realm/orgs/:org_id/invitations/:invitation_id",
            axum::routing::delete(delete_invitation),
        )
        .route(
            "/realms/:realm/orgs/:org_id/roles",
            get(list_roles).post(create_role),
        )
        .route(
            "/realms/:realm/orgs/:org_id/roles/:name",
            put(update_role).delete(delete_role),
        )
        .route(
            "/realms/:realm/orgs/:org_id/roles/:name/users/:user_id",
            get(check_role).put(grant_role).delete(revoke_role),
        )
        .route("/realms/:realm/users/:user_id/orgs", get(orgs_for_user))
        .route(
            "/realms/:realm/users/:user_id/orgs/:org_id/roles",
            get(roles_for_user),
        )
        .route("/realms/:realm/orgs/:org_id/idps", get(org_idps))
        .route("/realms/:realm/orgs/:org_id/idps/link", post(link_idp))
        .route(
            "/realms/:realm/orgs/:org_id/idps/:alias/unlink",
            post(unlink_idp),
        )
        .route("/realms/:realm/orgs/:org_id/portal-link", post(portal_link))
        .route(
            "/admin/realms/:realm/identity-provider/instances",
            get(list_idps),
        )
        .route(
            "/admin/realms/:realm/identity-provider/instances/:alias",
            put(update_idp),
        )
        .route("/admin/:realm/console/whoami", get(who_am_i))
        .layer(middleware::from_fn(require_bearer))
        .with_state(store)
}

// Organizations

async fn list_orgs(
    State(store): State<SharedStore>,
    Path(_realm): Path<String>,
    Query(query): Query<PageQuery>,
) -> Json<Vec<Organization>> {
    let store = store.lock().unwrap();
    let needle = query.needle();
    let matching = store.orgs.values().filter(|o| match &needle {
        Some(n) => o.name.to_lowercase().contains(n),
        None => true,
    });
    Json(query.page(matching.cloned()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrg {
    name: String,
    display_name: Option<String>,
    url: Option<String>,
    #[serde(default)]
    domains: Vec<String>,
    realm: String,
}

async fn create_org(
    State(store): State<SharedStore>,
    Path(realm): Path<String>,
    Json(body): Json<CreateOrg>,
) -> Response {
    if body.realm != realm {
        return error(StatusCode::BAD_REQUEST, "Realm mismatch");
    }

    let mut store = store.lock().unwrap();
    if store.orgs.values().any(|o| o.name == body.name) {
        return error(
            StatusCode::CONFLICT,
            &format!("Organization {} already exists", body.name),
        );
    }

    let id = format!("org-{}", Uuid::new_v4());
    store.orgs.insert(
        id.clone(),
        Organization {
            id,
            name: body.name,
            display_name: body.display_name,
            url: body.url,
            domains: body.domains,
            attributes: Attributes::new(),
        },
    );
    StatusCode::CREATED.into_response()
}

async fn get_org(
    State(store): State<SharedStore>,
    Path((_realm, org_id)): Path<(String, String)>,
) -> Response {
    let store = store.lock().unwrap();
    match store.orgs.get(&org_id) {
        Some(org) => Json(org.clone()).into_response(),
        None => not_found("Organization"),
    }
}

async fn update_org(
    State(store): State<SharedStore>,
    Path((_realm, org_id)): Path<(String, String)>,
    Json(mut org): Json<Organization>,
) -> Response {
    let mut store = store.lock().unwrap();
    if !store.orgs.contains_key(&org_id) {
        return not_found("Organization");
    }
    org.id = org_id.clone();
    store.orgs.insert(org_id, org);
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_org(
    State(store): State<SharedStore>,
    Path((_realm, org_id)): Path<(String, String)>,
) -> Response {
    let mut store = store.lock().unwrap();
    if store.orgs.remove(&org_id).is_none() {
        return not_found("Organization");
    }
    store.memberships.retain(|(org, _)| org != &org_id);
    store.roles.remove(&org_id);
    store.role_grants.retain(|(org, _, _)| org != &org_id);
    store.idp_links.retain(|(org, _)| org != &org_id);
    StatusCode::NO_CONTENT.into_response()
}

async fn orgs_for_user(
    State(store): State<SharedStore>,
    Path((_realm, user_id)): Path<(String, String)>,
) -> Json<Vec<Organization>> {
    let store = store.lock().unwrap();
    let orgs = store
        .memberships
        .iter()
        .filter(|(_, user)| user == &user_id)
        .filter_map(|(org, _)| store.orgs.get(org).cloned())
        .collect();
    Json(orgs)
}

// Members

async fn list_members(
    State(store): State<SharedStore>,
    Path((_realm, org_id)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> Response {
    let store = store.lock().unwrap();
    if !store.orgs.contains_key(&org_id) {
        return not_found("Organization");
    }

    let needle = query.needle();
    let members = store
        .memberships
        .iter()
        .filter(|(org, _)| org == &org_id)
        .filter_map(|(_, user)| store.users.get(user))
        .filter(|m| match &needle {
            Some(n) => m.matches(n),
            None => true,
        })
        .map(|m| {
            let mut member = m.clone();
            member.organization_member_attributes = store
                .member_attributes
                .get(&(org_id.clone(), m.id.clone()))
                .cloned()
                .unwrap_or_default();
            member
        });

    Json(query.page(members)).into_response()
}

async fn add_member(
    State(store): State<SharedStore>,
    Path((_realm, org_id, user_id)): Path<(String, String, String)>,
) -> Response {
    let mut store = store.lock().unwrap();
    if !store.orgs.contains_key(&org_id) {
        return not_found("Organization");
    }
    if !store.users.contains_key(&user_id) {
        return not_found("User");
    }
    store.memberships.insert((org_id, user_id));
    StatusCode::CREATED.into_response()
}

async fn remove_member(
    State(store): State<SharedStore>,
    Path((_realm, org_id, user_id)): Path<(String, String, String)>,
) -> Response {
    let mut store = store.lock().unwrap();
    if !store.memberships.remove(&(org_id.clone(), user_id.clone())) {
        return not_found("Member");
    }
    store.role_grants.retain(|(org, _, user)| !(org == &org_id && user == &user_id));
    StatusCode::NO_CONTENT.into_response()
}

async fn get_member_attributes(
    State(store): State<SharedStore>,
    Path((_realm, org_id, user_id)): Path<(String, String, String)>,
) -> Response {
    let store = store.lock().unwrap();
    if !store.memberships.contains(&(org_id.clone(), user_id.clone())) {
        return not_found("Member");
    }
    let attributes = store
        .member_attributes
        .get(&(org_id, user_id))
        .cloned()
        .unwrap_or_default();
    Json(attributes).into_response()
}

#[derive(Debug, Deserialize)]
pub struct AttributesBody {
    attributes: Attributes,
}

async fn update_member_attributes(
    State(store): State<SharedStore>,
    Path((_realm, org_id, user_id)): Path<(String, String, String)>,
    Json(body): Json<AttributesBody>,
) -> Response {
    let mut store = store.lock().unwrap();
    if !store.memberships.contains(&(org_id.clone(), user_id.clone())) {
        return not_found("Member");
    }
    store
        .member_attributes
        .insert((org_id, user_id), body.attributes);
    StatusCode::NO_CONTENT.into_response()
}

// Invitations

async fn list_invitations(
    State(store): State<SharedStore>,
    Path((_realm, org_id)): Path<(String, String)>,
) -> Json<Vec<Invitation>> {
    let store = store.lock().unwrap();
    Json(store.invitations.get(&org_id).cloned().unwrap_or_default())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitation {
    email: String,
    #[allow(dead_code)]
    send: bool,
    #[allow(dead_code)]
    redirect_uri: String,
}

async fn create_invitation(
    State(store): State<SharedStore>,
    Path((_realm, org_id)): Path<(String, String)>,
    Json(body): Json<CreateInvitation>,
) -> Response {
    let mut store = store.lock().unwrap();
    if !store.orgs.contains_key(&org_id) {
        return not_found("Organization");
    }

    let invitations = store.invitations.entry(org_id.clone()).or_default();
    if invitations.iter().any(|i| i.email == body.email) {
        return error(StatusCode::CONFLICT, "Invitation already exists");
    }
    invitations.push(Invitation {
        id: Uuid::new_v4().to_string(),
        email: body.email,
        created_at: Some("2024-01-01T00:00:00Z".to_string()),
        inviter_id: None,
        organization_id: Some(org_id),
    });
    StatusCode::CREATED.into_response()
}

async fn delete_invitation(
    State(store): State<SharedStore>,
    Path((_realm, org_id, invitation_id)): Path<(String, String, String)>,
) -> Response {
    let mut store = store.lock().unwrap();
    let invitations = store.invitations.entry(org_id).or_default();
    let before = invitations.len();
    invitations.retain(|i| i.id != invitation_id);
    if invitations.len() == before {
        return not_found("Invitation");
    }
    StatusCode::NO_CONTENT.into_response()
}

// Roles

async fn list_roles(
    State(store): State<SharedStore>,
    Path((_realm, org_id)): Path<(String, String)>,
) -> Json<Vec<OrgRole>> {
    let store = store.lock().unwrap();
    Json(store.roles.get(&org_id).cloned().unwrap_or_default())
}

async fn create_role(
    State(store): State<SharedStore>,
    Path((_realm, org_id)): Path<(String, String)>,
    Json(mut role): Json<OrgRole>,
) -> Response {
    let mut store = store.lock().unwrap();
    if !store.orgs.contains_key(&org_id) {
        return not_found("Organization");
    }

    let roles = store.roles.entry(org_id).or_default();
    if roles.iter().any(|r| r.name == role.name) {
        return error(
            StatusCode::CONFLICT,
            &format!("Role {} already exists", role.name),
        );
    }
    role.id = Some(Uuid::new_v4().to_string());
    roles.push(role);
    StatusCode::CREATED.into_response()
}

async fn update_role(
    State(store): State<SharedStore>,
    Path((_realm, org_id, name)): Path<(String, String, String)>,
    Json(update): Json<OrgRole>,
) -> Response {
    let mut store = store.lock().unwrap();
    let roles = store.roles.entry(org_id).or_default();
    match roles.iter_mut().find(|r| r.name == name) {
        Some(role) => {
            role.description = update.description;
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found("Role"),
    }
}

async fn delete_role(
    State(store): State<SharedStore>,
    Path((_realm, org_id, name)): Path<(String, String, String)>,
) -> Response {
    let mut store = store.lock().unwrap();
    let roles = store.roles.entry(org_id.clone()).or_default();
    let before = roles.len();
    roles.retain(|r| r.name != name);
    if roles.len() == before {
        return not_found("Role");
    }
    store
        .role_grants
        .retain(|(org, role, _)| !(org == &org_id && role == &name));
    StatusCode::NO_CONTENT.into_response()
}

fn role_exists(store: &AdminStore, org_id: &str, name: &str) -> bool {
    store
        .roles
        .get(org_id)
        .map(|roles| roles.iter().any(|r| r.name == name))
        .unwrap_or(false)
}

async fn check_role(
    State(store): State<SharedStore>,
    Path((_realm, org_id, name, user_id)): Path<(String, String, String, String)>,
) -> Response {
    let store = store.lock().unwrap();
    if store.role_grants.contains(&(org_id, name, user_id)) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found("Role grant")
    }
}

async fn grant_role(
    State(store): State<SharedStore>,
    Path((_realm, org_id, name, user_id)): Path<(String, String, String, String)>,
) -> Response {
    let mut store = store.lock().unwrap();
    if !role_exists(&store, &org_id, &name) {
        return not_found("Role");
    }
    if !store.memberships.contains(&(org_id.clone(), user_id.clone())) {
        return error(StatusCode::BAD_REQUEST, "User is not a member of the organization");
    }
    store.role_grants.insert((org_id, name, user_id));
    StatusCode::CREATED.into_response()
}

async fn revoke_role(
    State(store): State<SharedStore>,
    Path((_realm, org_id, name, user_id)): Path<(String, String, String, String)>,
) -> Response {
    let mut store = store.lock().unwrap();
    if !store.role_grants.remove(&(org_id, name, user_id)) {
        return not_found("Role grant");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn roles_for_user(
    State(store): State<SharedStore>,
    Path((_realm, user_id, org_id)): Path<(String, String, String)>,
) -> Response {
    let store = store.lock().unwrap();
    if !store.memberships.contains(&(org_id.clone(), user_id.clone())) {
        return not_found("Member");
    }
    let roles: Vec<OrgRole> = store
        .roles
        .get(&org_id)
        .map(|roles| {
            roles
                .iter()
                .filter(|r| {
                    store
                        .role_grants
                        .contains(&(org_id.clone(), r.name.clone(), user_id.clone()))
                })
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Json(roles).into_response()
}

// Identity providers

async fn list_idps(
    State(store): State<SharedStore>,
    Path(_realm): Path<String>,
    Query(query): Query<PageQuery>,
) -> Json<Vec<IdentityProvider>> {
    let store = store.lock().unwrap();
    let needle = query.needle();
    let matching = store.identity_providers.values().filter(|p| match &needle {
        Some(n) => p.alias.to_lowercase().contains(n),
        None => true,
    });
    Json(query.page(matching.cloned()))
}

async fn org_idps(
    State(store): State<SharedStore>,
    Path((_realm, org_id)): Path<(String, String)>,
) -> Response {
    let store = store.lock().unwrap();
    if !store.orgs.contains_key(&org_id) {
        return not_found("Organization");
    }
    let linked: Vec<IdentityProvider> = store
        .idp_links
        .iter()
        .filter(|(org, _)| org == &org_id)
        .filter_map(|(_, alias)| store.identity_providers.get(alias).cloned())
        .collect();
    Json(linked).into_response()
}

#[derive(Debug, Deserialize)]
pub struct LinkBody {
    alias: String,
    post_broker_flow: Option<String>,
    sync_mode: Option<String>,
}

async fn link_idp(
    State(store): State<SharedStore>,
    Path((_realm, org_id)): Path<(String, String)>,
    Json(body): Json<LinkBody>,
) -> Response {
    let mut store = store.lock().unwrap();
    if !store.orgs.contains_key(&org_id) {
        return not_found("Organization");
    }
    if store.idp_links.contains(&(org_id.clone(), body.alias.clone())) {
        return error(StatusCode::CONFLICT, "IdP already linked");
    }

    let Some(provider) = store.identity_providers.get_mut(&body.alias) else {
        return not_found("Identity provider");
    };
    if let Some(flow) = body.post_broker_flow {
        provider.post_broker_login_flow_alias = Some(flow);
    }
    if let Some(mode) = body.sync_mode {
        provider.config.insert("syncMode".to_string(), mode);
    }

    store.idp_links.insert((org_id, body.alias));
    StatusCode::CREATED.into_response()
}

async fn unlink_idp(
    State(store): State<SharedStore>,
    Path((_realm, org_id, alias)): Path<(String, String, String)>,
) -> Response {
    let mut store = store.lock().unwrap();
    if !store.idp_links.remove(&(org_id, alias)) {
        return not_found("Identity provider link");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn update_idp(
    State(store): State<SharedStore>,
    Path((_realm, alias)): Path<(String, String)>,
    Json(provider): Json<IdentityProvider>,
) -> Response {
    let mut store = store.lock().unwrap();
    if !store.identity_providers.contains_key(&alias) {
        return not_found("Identity provider");
    }
    store.identity_providers.insert(alias, provider);
    StatusCode::NO_CONTENT.into_response()
}

// Console

async fn get_orgs_config(
    State(store): State<SharedStore>,
    Path(_realm): Path<String>,
) -> Json<OrgsConfig> {
    Json(store.lock().unwrap().orgs_config.clone())
}

async fn update_orgs_config(
    State(store): State<SharedStore>,
    Path(_realm): Path<String>,
    Json(config): Json<OrgsConfig>,
) -> StatusCode {
    store.lock().unwrap().orgs_config = config;
    StatusCode::NO_CONTENT
}

#[derive(Debug, Deserialize)]
pub struct PortalLinkForm {
    #[serde(rename = "userId", default)]
    user_id: String,
}

async fn portal_link(
    State(store): State<SharedStore>,
    Path((realm, org_id)): Path<(String, String)>,
    Form(form): Form<PortalLinkForm>,
) -> Response {
    let store = store.lock().unwrap();
    if !store.orgs.contains_key(&org_id) {
        return not_found("Organization");
    }

    let user = if form.user_id.is_empty() {
        None
    } else {
        Some(form.user_id)
    };
    Json(json!({
        "link": format!("https://portal.test/realms/{}/portal/{}", realm, org_id),
        "user": user,
        "redirect": format!("https://portal.test/realms/{}/account", realm),
    }))
    .into_response()
}

async fn who_am_i(State(store): State<SharedStore>, Path(realm): Path<String>) -> Response {
    if realm != LOGIN_REALM {
        return error(StatusCode::UNAUTHORIZED, "Token not valid for this realm");
    }
    match store.lock().unwrap().who_am_i.clone() {
        Some(who) => Json(who).into_response(),
        None => error(StatusCode::UNAUTHORIZED, "Not signed in"),
    }
}
