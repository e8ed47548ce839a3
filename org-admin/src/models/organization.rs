//! Organization model and the provider-config attribute convention.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

/// Generic multi-valued attribute bag.
pub type Attributes = BTreeMap<String, Vec<String>>;

/// Attribute keys under this prefix carry typed sub-resource config
/// (styles, visibility flags) rather than user-facing attributes.
pub const PROVIDER_CONFIG_PREFIX: &str = "_providerConfig.";

/// Names must contain something other than whitespace.
fn validate_org_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some("Organization name is required".into());
        return Err(error);
    }
    Ok(())
}

/// Organization entity as returned by the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    #[validate(custom(function = "validate_org_name"))]
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Payload for creating an organization; the server assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewOrganization {
    #[validate(custom(function = "validate_org_name"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub domains: Vec<String>,
}

impl NewOrganization {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains = domains.into_iter().map(Into::into).collect();
        self
    }
}

/// Create request body: the form fields plus the owning realm.
#[derive(Debug, Serialize)]
pub(crate) struct CreateOrganizationRequest<'a> {
    #[serde(flatten)]
    pub organization: &'a NewOrganization,
    pub realm: &'a str,
}

/// Typed view over the `_providerConfig.*` keys of an attribute bag.
pub struct ProviderConfig<'a> {
    attributes: &'a Attributes,
}

impl<'a> ProviderConfig<'a> {
    pub fn new(attributes: &'a Attributes) -> Self {
        Self { attributes }
    }

    /// First value of `_providerConfig.{key}`, or `default`.
    pub fn value(&self, key: &str, default: &'a str) -> &'a str {
        self.attributes
            .get(&provider_key(key))
            .and_then(|values| values.first())
            .map(String::as_str)
            .unwrap_or(default)
    }

    /// Boolean flag stored as `"true"`/`"false"`; absent or unparseable
    /// values fall back to `default`.
    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.value(key, "") {
            "true" => true,
            "false" => false,
            _ => default,
        }
    }
}

pub fn provider_key(key: &str) -> String {
    format!("{}{}", PROVIDER_CONFIG_PREFIX, key)
}

/// Set `_providerConfig.{key}`; an empty value removes the key.
pub fn set_provider_config(attributes: &mut Attributes, key: &str, value: &str) {
    let full_key = provider_key(key);
    if value.is_empty() {
        attributes.remove(&full_key);
    } else {
        attributes.insert(full_key, vec![value.to_string()]);
    }
}

/// Split into (user-facing, provider-config) entries. Provider-config keys
/// come back sorted case-insensitively.
pub fn partition_attributes(attributes: &Attributes) -> (Attributes, Vec<(String, Vec<String>)>) {
    let mut public = Attributes::new();
    let mut private = Vec::new();

    for (key, values) in attributes {
        if key.starts_with(PROVIDER_CONFIG_PREFIX) {
            private.push((key.clone(), values.clone()));
        } else {
            public.insert(key.clone(), values.clone());
        }
    }
    private.sort_by_key(|(key, _)| key.to_lowercase());

    (public, private)
}

impl Organization {
    pub fn provider_config(&self) -> ProviderConfig<'_> {
        ProviderConfig::new(&self.attributes)
    }

    /// Replace user-facing attributes while keeping provider-config keys,
    /// ready for a full-replace update.
    pub fn with_public_attributes(mut self, public: Attributes) -> Self {
        let (_, private) = partition_attributes(&self.attributes);
        self.attributes = public
            .into_iter()
            .filter(|(key, _)| !key.starts_with(PROVIDER_CONFIG_PREFIX))
            .chain(private)
            .collect();
        self
    }
}
