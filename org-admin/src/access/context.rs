use super::capability::{Capability, Evaluator, GrantSet};
use crate::models::WhoAmI;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Principal {
    user_id: String,
    realm: String,
}

#[derive(Debug, Default)]
struct Snapshot {
    principal: Option<Principal>,
    grants: Arc<GrantSet>,
}

/// Grant set of the active (identity, realm) pair.
///
/// Reads take a snapshot and evaluate outside the lock, so predicates are
/// free to re-enter. This is a rendering hint; the server enforces access.
#[derive(Debug, Clone, Default)]
pub struct AccessContext {
    inner: Arc<RwLock<Snapshot>>,
}

impl AccessContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grants(grants: GrantSet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Snapshot {
                principal: None,
                grants: Arc::new(grants),
            })),
        }
    }

    pub fn grants(&self) -> Arc<GrantSet> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard.grants.clone()
    }

    pub fn has_access(&self, capabilities: &[Capability]) -> bool {
        let grants = self.grants();
        Evaluator::new(&grants).has_all(capabilities)
    }

    pub fn has_some_access(&self, capabilities: &[Capability]) -> bool {
        let grants = self.grants();
        Evaluator::new(&grants).has_any(capabilities)
    }

    /// Re-derive grants from the identity claim for `realm`.
    ///
    /// Returns false when the (identity, realm) pair is unchanged and the
    /// current grants were kept.
    pub fn refresh(&self, who_am_i: &WhoAmI, realm: &str) -> bool {
        let principal = Principal {
            user_id: who_am_i.user_id.clone(),
            realm: realm.to_string(),
        };

        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if guard.principal.as_ref() == Some(&principal) {
            return false;
        }

        let grants = GrantSet::new(who_am_i.realm_access(realm).iter().cloned());
        tracing::debug!(
            user_id = %principal.user_id,
            realm = %principal.realm,
            grants = grants.len(),
            "Access grants refreshed"
        );

        *guard = Snapshot {
            principal: Some(principal),
            grants: Arc::new(grants),
        };
        true
    }

    /// Drop the identity; no grants remain.
    pub fn clear(&self) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Snapshot::default();
    }
}
