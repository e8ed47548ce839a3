//! console-core: shared infrastructure for the admin console crates.
pub mod config;
pub mod error;
pub mod observability;

pub use reqwest;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;
