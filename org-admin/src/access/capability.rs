//! Capability values and the all/any evaluation rules.

use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// The universal wildcard tag.
pub const ANYONE: &str = "anyone";

/// Well-known access tags issued by the identity platform.
pub mod access_types {
    pub const VIEW_ORGANIZATIONS: &str = "view-organizations";
    pub const MANAGE_ORGANIZATIONS: &str = "manage-organizations";
    pub const VIEW_REALM: &str = "view-realm";
    pub const MANAGE_REALM: &str = "manage-realm";
    pub const VIEW_USERS: &str = "view-users";
    pub const MANAGE_USERS: &str = "manage-users";
    pub const QUERY_USERS: &str = "query-users";
    pub const QUERY_GROUPS: &str = "query-groups";
    pub const VIEW_IDENTITY_PROVIDERS: &str = "view-identity-providers";
    pub const MANAGE_IDENTITY_PROVIDERS: &str = "manage-identity-providers";
    pub const VIEW_CLIENTS: &str = "view-clients";
    pub const MANAGE_CLIENTS: &str = "manage-clients";
    pub const VIEW_EVENTS: &str = "view-events";
    pub const MANAGE_EVENTS: &str = "manage-events";
    pub const IMPERSONATION: &str = "impersonation";
}

type PredicateFn = dyn Fn(&Evaluator<'_>) -> bool + Send + Sync;

/// A required capability: a tag, the wildcard, or a composite rule.
#[derive(Clone)]
pub enum Capability {
    /// Always satisfied.
    Anyone,
    /// Satisfied when the tag is in the grant set.
    Named(String),
    /// Satisfied when the predicate returns true. The predicate may call
    /// back into [`Evaluator::has_all`] / [`Evaluator::has_any`] and must
    /// terminate on its own.
    Predicate(Arc<PredicateFn>),
    /// A value that is neither a tag nor a rule. Never satisfied.
    Malformed,
}

impl Capability {
    pub fn named(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if tag == ANYONE {
            Capability::Anyone
        } else {
            Capability::Named(tag)
        }
    }

    pub fn predicate<F>(rule: F) -> Self
    where
        F: Fn(&Evaluator<'_>) -> bool + Send + Sync + 'static,
    {
        Capability::Predicate(Arc::new(rule))
    }

    fn is_satisfied(&self, evaluator: &Evaluator<'_>) -> bool {
        match self {
            Capability::Anyone => true,
            Capability::Named(tag) => tag == ANYONE || evaluator.grants.contains(tag),
            Capability::Predicate(rule) => rule(evaluator),
            Capability::Malformed => false,
        }
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Anyone => f.write_str("Anyone"),
            Capability::Named(tag) => f.debug_tuple("Named").field(tag).finish(),
            Capability::Predicate(_) => f.write_str("Predicate(..)"),
            Capability::Malformed => f.write_str("Malformed"),
        }
    }
}

impl From<&str> for Capability {
    fn from(tag: &str) -> Self {
        Capability::named(tag)
    }
}

impl From<String> for Capability {
    fn from(tag: String) -> Self {
        Capability::named(tag)
    }
}

/// Capabilities read from untyped data (e.g. route metadata). Anything other
/// than a string becomes [`Capability::Malformed`].
impl From<&Value> for Capability {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(tag) => Capability::named(tag.as_str()),
            _ => Capability::Malformed,
        }
    }
}

/// Capability tags held by the current principal for the active realm.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantSet {
    tags: HashSet<String>,
}

impl GrantSet {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for GrantSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        GrantSet::new(iter)
    }
}

/// Evaluation handle over one grant set; this is what predicates receive.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    grants: &'a GrantSet,
}

impl<'a> Evaluator<'a> {
    pub fn new(grants: &'a GrantSet) -> Self {
        Self { grants }
    }

    /// True iff every capability is satisfied. Vacuously true when empty.
    pub fn has_all(&self, capabilities: &[Capability]) -> bool {
        capabilities.iter().all(|c| c.is_satisfied(self))
    }

    /// True iff at least one capability is satisfied. False when empty.
    pub fn has_any(&self, capabilities: &[Capability]) -> bool {
        capabilities.iter().any(|c| c.is_satisfied(self))
    }
}

pub fn has_access(grants: &GrantSet, capabilities: &[Capability]) -> bool {
    Evaluator::new(grants).has_all(capabilities)
}

pub fn has_some_access(grants: &GrantSet, capabilities: &[Capability]) -> bool {
    Evaluator::new(grants).has_any(capabilities)
}
