use console_core::error::CoreError;
use secrecy::Secret;
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub admin_api: AdminApiSettings,
    pub credentials: CredentialSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AdminApiSettings {
    /// Server root, e.g. `https://auth.example.com` (no trailing slash).
    pub server_base_url: String,
    /// Realm the console currently administers.
    pub realm: String,
    /// Realm the signed-in administrator belongs to. Console endpoints live
    /// under it whichever realm is administered.
    #[serde(default = "default_login_realm")]
    pub login_realm: String,
}

fn default_login_realm() -> String {
    "master".to_string()
}

impl AdminApiSettings {
    pub fn new(server_base_url: impl Into<String>, realm: impl Into<String>) -> Self {
        Self {
            server_base_url: server_base_url.into(),
            realm: realm.into(),
            login_realm: default_login_realm(),
        }
    }

    pub fn with_login_realm(mut self, login_realm: impl Into<String>) -> Self {
        self.login_realm = login_realm.into();
        self
    }

    fn server_root(&self) -> &str {
        self.server_base_url.trim_end_matches('/')
    }

    /// `{server}/realms/{realm}`: tenant-scoped organization endpoints.
    pub fn realm_url(&self) -> String {
        format!(
            "{}/realms/{}",
            self.server_root(),
            urlencoding::encode(&self.realm)
        )
    }

    /// `{server}/admin/realms/{realm}`: administrative endpoints.
    pub fn admin_url(&self) -> String {
        format!(
            "{}/admin/realms/{}",
            self.server_root(),
            urlencoding::encode(&self.realm)
        )
    }

    /// Same server and login realm, administering `realm`.
    pub fn for_realm(&self, realm: &str) -> Self {
        Self {
            realm: realm.to_string(),
            ..self.clone()
        }
    }
}

/// How the console obtains bearer tokens.
#[derive(Deserialize, Clone, Debug)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CredentialSettings {
    Static {
        token: Secret<String>,
    },
    ClientCredentials {
        #[serde(default = "default_token_realm")]
        token_realm: String,
        client_id: String,
        client_secret: Secret<String>,
    },
}

fn default_token_realm() -> String {
    "master".to_string()
}

#[derive(Deserialize, Clone, Debug)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, CoreError> {
    let configuration_directory = console_core::config::configuration_directory("org-admin")?;
    console_core::config::load(&configuration_directory)
}
