use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use cashflow_core::{
    storage::{profile_warnings, ProfileBackupInfo, ProfileStorage},
    CoreError,
};
use cashflow_domain::{Money, OverrideStore, Profile};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

const PROFILE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Root directories used by [`JsonProfileStorage`].
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub profile_root: PathBuf,
    pub backup_root: PathBuf,
}

/// Filesystem-backed JSON persistence for profiles and their backups.
#[derive(Clone)]
pub struct JsonProfileStorage {
    profiles_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonProfileStorage {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.profile_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            profiles_dir: paths.profile_root,
            backups_dir: paths.backup_root,
            retention: retention.max(1),
        })
    }

    pub fn profile_path(&self, name: &str) -> PathBuf {
        self.profiles_dir
            .join(format!("{}.{}", canonical_name(name), PROFILE_EXTENSION))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    /// Picks a backup file name that does not collide with an existing one.
    fn next_backup_path(&self, name: &str, note: Option<&str>) -> Result<PathBuf, CoreError> {
        let dir = self.backup_dir(name);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut stem = format!("{}_{}", canonical_name(name), timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let mut path = dir.join(format!("{}.{}", stem, PROFILE_EXTENSION));
        let mut counter = 2;
        while path.exists() {
            path = dir.join(format!("{}_{}.{}", stem, counter, PROFILE_EXTENSION));
            counter += 1;
        }
        Ok(path)
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        let backup_path = self.next_backup_path(name, None)?;
        fs::copy(path, &backup_path)?;
        self.prune_backups(name)?;
        Ok(())
    }

    fn prune_backups(&self, name: &str) -> Result<(), CoreError> {
        let entries = self.list_backups(name)?;
        for entry in entries.into_iter().skip(self.retention) {
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl ProfileStorage for JsonProfileStorage {
    fn save_profile(&self, name: &str, profile: &Profile) -> Result<(), CoreError> {
        let path = self.profile_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if path.exists() {
            self.backup_existing_file(name, &path)?;
        }
        save_profile_to_path(profile, &path)?;
        info!(profile = name, path = %path.display(), "profile saved");
        Ok(())
    }

    fn load_profile(&self, name: &str) -> Result<Profile, CoreError> {
        let path = self.profile_path(name);
        if !path.exists() {
            return Err(CoreError::ProfileNotFound(name.to_string()));
        }
        load_profile_from_path(&path)
    }

    fn list_profiles(&self) -> Result<Vec<String>, CoreError> {
        if !self.profiles_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.profiles_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(PROFILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_profile(&self, name: &str) -> Result<(), CoreError> {
        let path = self.profile_path(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn backup_profile(
        &self,
        name: &str,
        profile: &Profile,
        note: Option<&str>,
    ) -> Result<ProfileBackupInfo, CoreError> {
        let path = self.next_backup_path(name, note)?;
        write_atomic(&path, &serialize_profile(profile)?)?;
        self.prune_backups(name)?;
        let id = path
            .file_name()
            .and_then(|file| file.to_str())
            .unwrap_or_default()
            .to_string();
        info!(profile = name, backup = %id, "profile backup written");
        Ok(ProfileBackupInfo {
            profile: canonical_name(name),
            created_at: backup_timestamp_label(&id),
            id,
            path,
        })
    }

    fn list_backups(&self, name: &str) -> Result<Vec<ProfileBackupInfo>, CoreError> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        let profile_slug = canonical_name(name);
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(PROFILE_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(ProfileBackupInfo {
                    profile: profile_slug.clone(),
                    id: file_name.to_string(),
                    created_at: backup_timestamp_label(file_name),
                    path: path.clone(),
                });
            }
        }
        entries.sort_by_key(|info| Reverse((parse_backup_timestamp(&info.id), info.id.clone())));
        Ok(entries)
    }

    fn restore_backup(&self, backup: &ProfileBackupInfo) -> Result<Profile, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let profile = load_profile_from_path(&backup.path)?;
        let target = self.profile_path(&backup.profile);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&backup.path, &target)?;
        info!(backup = %backup.id, "profile restored from backup");
        Ok(profile)
    }
}

/// Saves a profile to an arbitrary path on disk.
pub fn save_profile_to_path(profile: &Profile, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_profile(profile)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a profile from the provided filesystem path.
pub fn load_profile_from_path(path: &Path) -> Result<Profile, CoreError> {
    let data = fs::read_to_string(path)?;
    let profile = decode_profile(&data)?;
    for warning in profile_warnings(&profile) {
        warn!(path = %path.display(), "{warning}");
    }
    Ok(profile)
}

/// Decodes a profile document, reading the override map leniently.
pub fn decode_profile(data: &str) -> Result<Profile, CoreError> {
    let mut document: Value = serde_json::from_str(data).map_err(serde_error)?;
    let overrides = document
        .as_object_mut()
        .and_then(|fields| fields.remove("overrides"))
        .map(|raw| parse_overrides(&raw))
        .unwrap_or_default();
    let mut profile: Profile = serde_json::from_value(document).map_err(serde_error)?;
    profile.overrides = overrides;
    Ok(profile)
}

/// Reads a `{series: {date: number | null}}` map, skipping malformed entries.
pub fn parse_overrides(raw: &Value) -> OverrideStore {
    let mut store = OverrideStore::new();
    let Some(series_map) = raw.as_object() else {
        if !raw.is_null() {
            warn!("override map is not an object; ignoring it");
        }
        return store;
    };
    for (series_id, dates) in series_map {
        let Some(dates) = dates.as_object() else {
            warn!(series = %series_id, "overrides for series are not an object; skipped");
            continue;
        };
        for (key, value) in dates {
            let Ok(date) = NaiveDate::parse_from_str(key, "%Y-%m-%d") else {
                warn!(series = %series_id, key = %key, "override key is not a date; skipped");
                continue;
            };
            match value {
                Value::Null => store.cancel(series_id, date),
                Value::Number(number) => match number.as_f64().map(Money::from_f64) {
                    Some(Ok(amount)) => store.set_amount(series_id, date, amount),
                    _ => warn!(series = %series_id, %date, "override amount out of range; skipped"),
                },
                _ => warn!(series = %series_id, %date, "override value is not a number; skipped"),
            }
        }
    }
    store
}

/// File stem used for a profile name: lowercase ASCII alphanumerics and underscores.
pub fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "profile".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Finds the `YYYYMMDD_HHMMSS` pair inside a backup file name.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", PROFILE_EXTENSION))?;
    let segments = trimmed.split('_').collect::<Vec<_>>();
    segments.windows(2).rev().find_map(|pair| {
        if !is_digits(pair[0], 8) || !is_digits(pair[1], 6) {
            return None;
        }
        NaiveDateTime::parse_from_str(&format!("{}{}", pair[0], pair[1]), "%Y%m%d%H%M%S")
            .ok()
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
    })
}

fn backup_timestamp_label(name: &str) -> String {
    parse_backup_timestamp(name)
        .map(|timestamp| timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| name.to_string())
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn serialize_profile(profile: &Profile) -> Result<String, CoreError> {
    serde_json::to_string_pretty(profile).map_err(serde_error)
}

fn serde_error(err: serde_json::Error) -> CoreError {
    CoreError::Serde(err.to_string())
}
