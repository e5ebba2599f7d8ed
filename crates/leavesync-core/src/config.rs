//! TOML-based sync configuration.
//!
//! Stores the mapping knobs the normalizers and the planner need:
//! - Daily working time (and an optional per-weekday table)
//! - Vendor absence type → category mapping
//! - Category → target event name mapping
//! - Ignored leave reasons
//! - Pipeline switches (dry run, compression, half-day splitting)
//!
//! Configuration is stored at `~/.config/leavesync/config.toml`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::collection::ChangeOptions;
use crate::error::ConfigError;
use crate::interval::Category;

/// Sync configuration.
///
/// Serialized to/from TOML. Every field has a default so a partial file is
/// valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Working minutes in one day.
    #[serde(default = "default_working_minutes")]
    pub working_minutes: u32,
    /// Working hours per weekday name (`monday`, `tue`, ...). Days not
    /// listed fall back to `working_minutes`.
    #[serde(default)]
    pub weekly_hours: BTreeMap<String, f64>,
    #[serde(default = "default_true")]
    pub dry_run: bool,
    #[serde(default = "default_true")]
    pub compress: bool,
    #[serde(default = "default_true")]
    pub split_half_days: bool,
    /// Vendor absence type name → category tag.
    #[serde(default)]
    pub categories: BTreeMap<String, Category>,
    /// Category given to absences whose type has no mapping.
    #[serde(default = "default_fallback_category")]
    pub fallback_category: Category,
    /// Leave reasons whose absences are skipped.
    #[serde(default)]
    pub ignored_reasons: Vec<String>,
    /// Category tag → target event name.
    #[serde(default)]
    pub target_categories: BTreeMap<String, String>,
}

fn default_working_minutes() -> u32 {
    7 * 60
}
fn default_true() -> bool {
    true
}
fn default_fallback_category() -> Category {
    Category::OtherLeave
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            working_minutes: default_working_minutes(),
            weekly_hours: BTreeMap::new(),
            dry_run: true,
            compress: true,
            split_half_days: true,
            categories: BTreeMap::new(),
            fallback_category: default_fallback_category(),
            ignored_reasons: Vec::new(),
            target_categories: BTreeMap::new(),
        }
    }
}

impl SyncConfig {
    /// Returns `~/.config/leavesync[-dev]/config.toml` based on LEAVESYNC_ENV.
    ///
    /// # Errors
    /// Returns an error if no configuration directory can be determined.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let base_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        let env = std::env::var("LEAVESYNC_ENV").unwrap_or_else(|_| "production".to_string());

        let dir = if env == "dev" {
            base_dir.join("leavesync-dev")
        } else {
            base_dir.join("leavesync")
        };

        Ok(dir.join("config.toml"))
    }

    /// Load and validate a config file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or fails
    /// [`validate`](Self::validate).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: SyncConfig = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from disk, or the defaults when the file does not exist.
    ///
    /// # Errors
    /// A file that exists but is invalid is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Persist to disk, creating parent directories.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };

        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Check values serde cannot check on its own.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.working_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "working_minutes".into(),
                message: "must be greater than zero".into(),
            });
        }

        for (day, hours) in &self.weekly_hours {
            if day.parse::<Weekday>().is_err() {
                return Err(ConfigError::InvalidValue {
                    key: format!("weekly_hours.{day}"),
                    message: "not a weekday".into(),
                });
            }
            if !hours.is_finite() || *hours < 0.0 || *hours > 24.0 {
                return Err(ConfigError::InvalidValue {
                    key: format!("weekly_hours.{day}"),
                    message: format!("{hours} is not a number of hours in a day"),
                });
            }
        }

        for tag in self.target_categories.keys() {
            if tag.parse::<Category>().is_err() {
                return Err(ConfigError::InvalidValue {
                    key: format!("target_categories.{tag}"),
                    message: "not a category".into(),
                });
            }
        }

        Ok(())
    }

    /// Preparation steps the planner applies before diffing.
    pub fn change_options(&self) -> ChangeOptions {
        ChangeOptions::new(self.compress, self.split_half_days)
    }

    /// Working minutes on `date`, honouring the weekly table.
    pub fn working_minutes_on(&self, date: NaiveDate) -> u32 {
        let weekday = date.weekday();

        self.weekly_hours
            .iter()
            .find(|(day, _)| day.parse::<Weekday>().ok() == Some(weekday))
            .map(|(_, hours)| (hours * 60.0).round() as u32)
            .unwrap_or(self.working_minutes)
    }

    /// Category for a vendor absence type, falling back when unmapped.
    pub fn category_for_absence_type(&self, absence_type: Option<&str>) -> Category {
        absence_type
            .and_then(|name| self.categories.get(name))
            .copied()
            .unwrap_or(self.fallback_category)
    }

    pub fn is_ignored_reason(&self, reason: Option<&str>) -> bool {
        reason.is_some_and(|reason| self.ignored_reasons.iter().any(|ignored| ignored == reason))
    }

    /// Target event name for a category, if configured.
    pub fn target_event(&self, category: Category) -> Option<&str> {
        self.target_categories
            .get(category.as_str())
            .map(String::as_str)
    }

    /// Reverse lookup of a target event name.
    pub fn category_for_target_event(&self, event: &str) -> Option<Category> {
        self.target_categories
            .iter()
            .find(|(_, name)| name.as_str() == event)
            .and_then(|(tag, _)| tag.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_config_roundtrip() {
        let cfg = SyncConfig::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: SyncConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = SyncConfig::default();
        assert_eq!(cfg.working_minutes, 420);
        assert!(cfg.dry_run);
        assert!(cfg.compress);
        assert!(cfg.split_half_days);
        assert_eq!(cfg.fallback_category, Category::OtherLeave);
        assert!(cfg.categories.is_empty());
    }

    #[test]
    fn partial_file_uses_defaults() {
        let cfg: SyncConfig = toml::from_str(
            r#"
            dry_run = false
            ignored_reasons = ["Bereavement"]

            [categories]
            "Annual Leave" = "holiday"
            "Unpaid" = "other_unplanned"

            [target_categories]
            holiday = "Holiday"
            sickness = "Sick leave"
            "#,
        )
        .unwrap();

        assert!(!cfg.dry_run);
        assert_eq!(cfg.working_minutes, 420);
        assert_eq!(cfg.category_for_absence_type(Some("Annual Leave")), Category::Holiday);
        assert_eq!(cfg.category_for_absence_type(Some("Unknown")), Category::OtherLeave);
        assert_eq!(cfg.category_for_absence_type(None), Category::OtherLeave);
        assert!(cfg.is_ignored_reason(Some("Bereavement")));
        assert!(!cfg.is_ignored_reason(None));
        assert_eq!(cfg.target_event(Category::Sickness), Some("Sick leave"));
        assert_eq!(cfg.category_for_target_event("Holiday"), Some(Category::Holiday));
        assert_eq!(cfg.category_for_target_event("Other"), None);
    }

    #[test]
    fn unknown_category_tag_fails_to_parse() {
        let result: Result<SyncConfig, _> = toml::from_str(
            r#"
            [categories]
            "Annual Leave" = "vacation"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let cfg = SyncConfig {
            working_minutes: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "working_minutes"
        ));

        let mut cfg = SyncConfig::default();
        cfg.weekly_hours.insert("someday".into(), 7.0);
        assert!(cfg.validate().is_err());

        let mut cfg = SyncConfig::default();
        cfg.weekly_hours.insert("monday".into(), 25.0);
        assert!(cfg.validate().is_err());

        let mut cfg = SyncConfig::default();
        cfg.target_categories.insert("vacation".into(), "Vacation".into());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn working_minutes_on_uses_weekly_table() {
        let cfg: SyncConfig = toml::from_str(
            r#"
            [weekly_hours]
            monday = 8.0
            wed = 3.5
            "#,
        )
        .unwrap();
        assert!(cfg.validate().is_ok());

        // 2000-01-03 was a Monday.
        assert_eq!(cfg.working_minutes_on(date(2000, 1, 3)), 480);
        assert_eq!(cfg.working_minutes_on(date(2000, 1, 4)), 420);
        assert_eq!(cfg.working_minutes_on(date(2000, 1, 5)), 210);
        assert_eq!(cfg.working_minutes_on(date(2000, 1, 9)), 420);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = SyncConfig::default();
        cfg.working_minutes = 450;
        cfg.categories.insert("Annual Leave".into(), Category::Holiday);
        cfg.weekly_hours.insert("friday".into(), 4.0);
        cfg.target_categories.insert("holiday".into(), "Holiday".into());
        cfg.save(&path).unwrap();

        let loaded = SyncConfig::load(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = SyncConfig::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(cfg, SyncConfig::default());
    }

    #[test]
    fn load_reports_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "working_minutes = \"lots\"").unwrap();

        assert!(matches!(
            SyncConfig::load(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
