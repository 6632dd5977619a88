use std::{env, path::PathBuf};

use cashflow_config::{model::default_app_dir, Config};
use cashflow_storage_json::StoragePaths;

pub const HOME_ENV: &str = "CASHFLOW_HOME";

/// `$CASHFLOW_HOME` when set, otherwise `~/.cashflow`.
pub fn app_data_dir() -> PathBuf {
    match env::var_os(HOME_ENV) {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => default_app_dir(),
    }
}

/// Profile and backup roots, honouring overrides stored in the config.
pub fn storage_paths(config: &Config) -> StoragePaths {
    let base = app_data_dir();
    StoragePaths {
        profile_root: config.resolve_profile_root(&base),
        backup_root: config.resolve_backup_root(&base),
    }
}
