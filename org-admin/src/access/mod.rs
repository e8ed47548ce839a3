//! Access evaluation: decide which console actions the current principal
//! may see, from the grant set issued for the active realm.
pub mod capability;
pub mod context;

pub use capability::{
    access_types, has_access, has_some_access, Capability, Evaluator, GrantSet, ANYONE,
};
pub use context::AccessContext;
