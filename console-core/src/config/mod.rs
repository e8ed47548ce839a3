use crate::error::CoreError;
use config::{Config as Cfg, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Load layered settings: `base.yaml` from `configuration_directory`, then
/// `APP_`-prefixed environment variables (`__` separates nested keys).
pub fn load<T: DeserializeOwned>(configuration_directory: &Path) -> Result<T, CoreError> {
    dotenvy::dotenv().ok();

    let settings = Cfg::builder()
        .add_source(File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize::<T>()?)
}

/// Resolve `<crate>/config` whether the process runs from the workspace root
/// or from inside the crate directory.
pub fn configuration_directory(crate_dir: &str) -> Result<PathBuf, CoreError> {
    let base_path = std::env::current_dir()?;

    if base_path.ends_with(crate_dir) {
        Ok(base_path.join("config"))
    } else {
        Ok(base_path.join(crate_dir).join("config"))
    }
}
