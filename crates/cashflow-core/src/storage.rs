use std::path::PathBuf;

use cashflow_domain::Profile;

use crate::CoreError;

/// Describes a persisted backup artifact for a profile.
#[derive(Debug, Clone)]
pub struct ProfileBackupInfo {
    pub profile: String,
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Abstraction over persistence backends capable of storing profiles and backups.
///
/// Writes overwrite whole documents; the last writer wins.
pub trait ProfileStorage: Send + Sync {
    fn save_profile(&self, name: &str, profile: &Profile) -> Result<(), CoreError>;
    fn load_profile(&self, name: &str) -> Result<Profile, CoreError>;
    fn list_profiles(&self) -> Result<Vec<String>, CoreError>;
    fn delete_profile(&self, name: &str) -> Result<(), CoreError>;
    fn backup_profile(
        &self,
        name: &str,
        profile: &Profile,
        note: Option<&str>,
    ) -> Result<ProfileBackupInfo, CoreError>;
    fn list_backups(&self, name: &str) -> Result<Vec<ProfileBackupInfo>, CoreError>;
    fn restore_backup(&self, backup: &ProfileBackupInfo) -> Result<Profile, CoreError>;
}

/// Detects dangling references within a profile snapshot.
pub fn profile_warnings(profile: &Profile) -> Vec<String> {
    let mut warnings = Vec::new();
    for (series_id, date, _) in profile.overrides.iter() {
        if profile.series(series_id).is_none() {
            warnings.push(format!(
                "override on {date} references unknown series {series_id}"
            ));
        }
    }
    for series in &profile.series {
        if let (Some(first), Some(last)) = (series.first, series.last) {
            if last < first {
                warnings.push(format!(
                    "series {} ends on {last} before its first date {first}",
                    series.id
                ));
            }
        }
    }
    warnings
}
