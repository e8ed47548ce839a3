pub mod identity_provider;
pub mod invitation;
pub mod member;
pub mod organization;
pub mod orgs_config;
pub mod page;
pub mod role;
pub mod who_am_i;

pub use identity_provider::{
    enabled_home_idp, HomeIdpDiscovery, IdentityProvider, IdentityProviderLink,
    LinkIdentityProvider, SyncMode,
};
pub use invitation::{Invitation, NewInvitation};
pub use member::{GroupRef, OrganizationMember};
pub use organization::{
    partition_attributes, set_provider_config, Attributes, NewOrganization, Organization,
    ProviderConfig, PROVIDER_CONFIG_PREFIX,
};
pub use orgs_config::{OrgsConfig, PortalLink};
pub use page::PageRequest;
pub use role::OrgRole;
pub use who_am_i::WhoAmI;
