use cashflow_core::AdjustmentPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

pub const DEFAULT_FIRST_DAY: u32 = 1;
pub const DEFAULT_HORIZON_MONTHS: u32 = 1;

/// Stores user preferences for the accounting cycle and checkpoint reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Day of the month a cycle starts on, clamped to shorter months.
    #[serde(default = "Config::default_first_day")]
    pub first_day: u32,
    #[serde(default = "Config::default_horizon_months")]
    pub horizon_months: u32,
    #[serde(default = "Config::default_adjustment_category")]
    pub adjustment_category: String,
    #[serde(default)]
    pub adjustment_tags: Vec<String>,
    /// `None` or `0` books each checkpoint gap as a single adjustment.
    #[serde(default = "Config::default_adjustment_step_days")]
    pub adjustment_step_days: Option<u32>,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_budget: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for profiles. Defaults to `<app dir>/profiles`.
    pub profile_root: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for backups. Defaults to `<app dir>/backups`.
    pub backup_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            first_day: Self::default_first_day(),
            horizon_months: Self::default_horizon_months(),
            adjustment_category: Self::default_adjustment_category(),
            adjustment_tags: Vec::new(),
            adjustment_step_days: Self::default_adjustment_step_days(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            last_opened_profile: None,
            active_budget: None,
            profile_root: None,
            backup_root: None,
        }
    }
}

impl Config {
    pub fn default_first_day() -> u32 {
        DEFAULT_FIRST_DAY
    }

    pub fn default_horizon_months() -> u32 {
        DEFAULT_HORIZON_MONTHS
    }

    pub fn default_adjustment_category() -> String {
        AdjustmentPolicy::default().category
    }

    pub fn default_adjustment_step_days() -> Option<u32> {
        AdjustmentPolicy::default().step_days
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn set_first_day(&mut self, day: u32) -> Result<(), ConfigError> {
        if !(1..=31).contains(&day) {
            return Err(ConfigError::Invalid(format!(
                "first day must be within 1..=31 (got {day})"
            )));
        }
        self.first_day = day;
        Ok(())
    }

    pub fn set_horizon_months(&mut self, months: u32) -> Result<(), ConfigError> {
        if months == 0 {
            return Err(ConfigError::Invalid("horizon must be at least one month".into()));
        }
        self.horizon_months = months;
        Ok(())
    }

    pub fn set_adjustment_category(&mut self, category: &str) -> Result<(), ConfigError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(ConfigError::Invalid("adjustment category must not be empty".into()));
        }
        self.adjustment_category = category.to_string();
        Ok(())
    }

    /// Spacing of spread adjustments, `None` when spreading is disabled.
    pub fn effective_step_days(&self) -> Option<u32> {
        self.adjustment_step_days.filter(|days| *days > 0)
    }

    /// Checks values that may have been edited by hand.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut probe = self.clone();
        probe.set_first_day(self.first_day)?;
        probe.set_horizon_months(self.horizon_months)?;
        probe.set_adjustment_category(&self.adjustment_category)?;
        Ok(())
    }

    pub fn resolve_profile_root(&self, app_dir: &std::path::Path) -> PathBuf {
        self.profile_root
            .clone()
            .unwrap_or_else(|| app_dir.join("profiles"))
    }

    pub fn resolve_backup_root(&self, app_dir: &std::path::Path) -> PathBuf {
        self.backup_root
            .clone()
            .unwrap_or_else(|| app_dir.join("backups"))
    }
}

/// Default application directory: `~/.cashflow`, falling back to the working directory.
pub fn default_app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cashflow")
}
