pub mod admin_client;
pub mod console;
pub mod identity_providers;
pub mod invitations;
pub mod members;
pub mod organizations;
pub mod outcome;
pub mod roles;
pub mod token_provider;

pub use admin_client::OrgAdminClient;
pub use outcome::{error_message, Acknowledged, ApiResult, Failure, FailureReason, Outcome};
pub use token_provider::{
    token_provider_from_settings, ClientCredentialsTokenProvider, StaticTokenProvider,
    TokenProvider,
};
