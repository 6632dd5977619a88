use cashflow_config::{Config, ConfigError, ConfigManager};
use cashflow_core::AdjustmentPolicy;
use tempfile::tempdir;

#[test]
fn default_config_matches_documented_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.first_day, 1);
    assert_eq!(cfg.horizon_months, 1);
    assert_eq!(cfg.adjustment_category, "Everyday");
    assert_eq!(cfg.effective_step_days(), Some(7));
    assert!(cfg.ui_color_enabled);
}

#[test]
fn adjustment_defaults_follow_the_reconciliation_policy() {
    let cfg = Config::default();
    let policy = AdjustmentPolicy::default();

    assert_eq!(cfg.adjustment_category, policy.category);
    assert_eq!(cfg.adjustment_tags, policy.tags);
    assert_eq!(cfg.adjustment_step_days, policy.step_days);
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"), dir.path().join("backups"));

    let mut cfg = Config::default();
    cfg.set_first_day(25).expect("first day");
    cfg.set_horizon_months(2).expect("horizon");
    cfg.adjustment_step_days = Some(0);
    cfg.last_opened_profile = Some("household".into());

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(loaded.effective_step_days(), None);
}

#[test]
fn missing_config_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn partial_documents_fill_defaults() {
    let cfg: Config = serde_json::from_str(r#"{"first_day": 6}"#).expect("parse");
    assert_eq!(cfg.first_day, 6);
    assert_eq!(cfg.horizon_months, 1);
    assert_eq!(cfg.adjustment_step_days, Some(7));
}

#[test]
fn invalid_settings_are_rejected() {
    let mut cfg = Config::default();
    assert!(matches!(cfg.set_first_day(0), Err(ConfigError::Invalid(_))));
    assert!(matches!(cfg.set_first_day(32), Err(ConfigError::Invalid(_))));
    assert!(cfg.set_horizon_months(0).is_err());
    assert!(cfg.set_adjustment_category("  ").is_err());

    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"), dir.path().join("backups"));
    std::fs::write(manager.config_path(), r#"{"horizon_months": 0}"#).expect("write");
    assert!(manager.load().is_err());
}

#[test]
fn backups_restore_previous_settings() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.set_first_day(15).unwrap();
    manager.save(&cfg).unwrap();
    let first = manager.backup(&cfg, Some("mid month")).expect("backup");
    assert!(first.contains("mid-month"));

    cfg.set_first_day(1).unwrap();
    manager.save(&cfg).unwrap();
    let second = manager.backup(&cfg, None).expect("second backup");

    let listed = manager.list_backups().expect("list");
    assert_eq!(listed.len(), 2);
    assert!(listed.contains(&first) && listed.contains(&second));

    let restored = manager.restore(&first).expect("restore");
    assert_eq!(restored.first_day, 15);
    assert_eq!(manager.load().unwrap().first_day, 15);
}
