//! User settings and their persistence.
//!
//! Settings are a single JSON record in the key-value store under
//! [`SETTINGS_KEY`]. Reading never fails: a missing, unreadable or invalid
//! record yields the full default object. Writing never fails either: errors
//! are logged and the in-memory value stays authoritative.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::KvStore;
use crate::error::{ConfigError, ValidationError};

/// Key of the persisted settings record.
pub const SETTINGS_KEY: &str = "focusMocusSettings";

/// User-configurable durations and toggles.
///
/// Serialized with camelCase keys. Deserialization is strict: every field
/// must be present, otherwise the whole record is treated as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub pomodoro_enabled: bool,
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub cycles_before_long_break: u32,
    pub auto_start_pomodoro: bool,
    pub show_seconds: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pomodoro_enabled: true,
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            cycles_before_long_break: 4,
            auto_start_pomodoro: true,
            show_seconds: true,
        }
    }
}

impl Settings {
    /// Check that every minute value and the cycle count is at least 1.
    pub fn validate(&self) -> Result<(), ValidationError> {
        positive("workMinutes", self.work_minutes)?;
        positive("shortBreakMinutes", self.short_break_minutes)?;
        positive("longBreakMinutes", self.long_break_minutes)?;
        positive("cyclesBeforeLongBreak", self.cycles_before_long_break)?;
        Ok(())
    }

    /// Get a single field rendered as a string, by its camelCase key.
    pub fn get_field(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        json.get(key).map(|v| v.to_string())
    }
}

fn positive(field: &'static str, value: u32) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(())
}

/// Field-level update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pomodoro_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_break_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_break_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycles_before_long_break: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_start_pomodoro: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_seconds: Option<bool>,
}

impl SettingsPatch {
    /// Reject zero minute/cycle values before anything is merged.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let numeric = [
            ("workMinutes", self.work_minutes),
            ("shortBreakMinutes", self.short_break_minutes),
            ("longBreakMinutes", self.long_break_minutes),
            ("cyclesBeforeLongBreak", self.cycles_before_long_break),
        ];
        for (field, value) in numeric {
            if let Some(v) = value {
                positive(field, v)?;
            }
        }
        Ok(())
    }

    /// Merge into `settings`, overwriting only the fields present here.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(v) = self.pomodoro_enabled {
            settings.pomodoro_enabled = v;
        }
        if let Some(v) = self.work_minutes {
            settings.work_minutes = v;
        }
        if let Some(v) = self.short_break_minutes {
            settings.short_break_minutes = v;
        }
        if let Some(v) = self.long_break_minutes {
            settings.long_break_minutes = v;
        }
        if let Some(v) = self.cycles_before_long_break {
            settings.cycles_before_long_break = v;
        }
        if let Some(v) = self.auto_start_pomodoro {
            settings.auto_start_pomodoro = v;
        }
        if let Some(v) = self.show_seconds {
            settings.show_seconds = v;
        }
    }

    /// Build a one-field patch from a `key value` pair typed on the command line.
    ///
    /// The value is parsed according to the type the key has in [`Settings`]:
    /// `true`/`false` for toggles, a positive integer for minutes and cycles.
    pub fn from_pair(key: &str, value: &str) -> Result<Self, ConfigError> {
        let defaults = serde_json::to_value(Settings::default())
            .map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        let existing = defaults
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let parsed = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .trim()
                    .parse::<bool>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
            ),
            _ => {
                let n = value
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                serde_json::Value::Number(n.into())
            }
        };

        let mut object = serde_json::Map::new();
        object.insert(key.to_string(), parsed);
        let patch: SettingsPatch = serde_json::from_value(serde_json::Value::Object(object))
            .map_err(|e| invalid(e.to_string()))?;
        patch.validate()?;
        Ok(patch)
    }
}

/// Owns the current settings and writes every change through to a [`KvStore`].
///
/// Consumers that need to react to changes hold a [`watch::Receiver`] from
/// [`SettingsStore::subscribe`].
pub struct SettingsStore<S> {
    store: S,
    tx: watch::Sender<Settings>,
}

impl<S: KvStore> SettingsStore<S> {
    /// Load settings from `store` and take ownership of it.
    pub fn open(store: S) -> Self {
        let settings = Self::load(&store);
        let (tx, _rx) = watch::channel(settings);
        Self { store, tx }
    }

    /// Read the persisted record, falling back to defaults on any problem.
    pub fn load(store: &S) -> Settings {
        let raw = match store.kv_get(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("no saved settings, using defaults");
                return Settings::default();
            }
            Err(e) => {
                tracing::warn!("Error loading settings: {e}");
                return Settings::default();
            }
        };

        match serde_json::from_str::<Settings>(&raw) {
            Ok(settings) => match settings.validate() {
                Ok(()) => settings,
                Err(e) => {
                    tracing::warn!("Saved settings rejected, using defaults: {e}");
                    Settings::default()
                }
            },
            Err(e) => {
                tracing::warn!("Saved settings are malformed, using defaults: {e}");
                Settings::default()
            }
        }
    }

    /// Write `settings` to the store. Failures are logged and swallowed.
    pub fn save(store: &S, settings: &Settings) {
        let json = match serde_json::to_string(settings) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Error serializing settings: {e}");
                return;
            }
        };
        if let Err(e) = store.kv_set(SETTINGS_KEY, &json) {
            tracing::warn!("Error saving settings: {e}");
        }
    }

    /// Current settings.
    pub fn settings(&self) -> Settings {
        self.tx.borrow().clone()
    }

    /// Merge `patch`, persist, and notify subscribers.
    ///
    /// A patch with a zero minute/cycle value is rejected as a whole and
    /// nothing changes.
    pub fn update(&self, patch: &SettingsPatch) -> Result<Settings, ValidationError> {
        patch.validate()?;
        let mut next = self.settings();
        patch.apply_to(&mut next);
        Self::save(&self.store, &next);
        self.tx.send_replace(next.clone());
        Ok(next)
    }

    /// Restore defaults, persist, and notify subscribers.
    pub fn reset(&self) -> Settings {
        let defaults = Settings::default();
        Self::save(&self.store, &defaults);
        self.tx.send_replace(defaults.clone());
        defaults
    }

    /// Receive every future settings change.
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    /// The underlying key-value store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStore;

    /// Store whose reads and writes always fail.
    struct FailingStore;

    impl KvStore for FailingStore {
        fn kv_get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::QueryFailed("disk on fire".into()))
        }

        fn kv_set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::WriteRejected {
                key: key.to_string(),
                message: "quota exceeded".into(),
            })
        }
    }

    fn store_with(raw: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store.kv_set(SETTINGS_KEY, raw).unwrap();
        store
    }

    #[test]
    fn default_values() {
        let s = Settings::default();
        assert!(s.pomodoro_enabled);
        assert_eq!(s.work_minutes, 25);
        assert_eq!(s.short_break_minutes, 5);
        assert_eq!(s.long_break_minutes, 15);
        assert_eq!(s.cycles_before_long_break, 4);
        assert!(s.auto_start_pomodoro);
        assert!(s.show_seconds);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["workMinutes"], 25);
        assert_eq!(json["cyclesBeforeLongBreak"], 4);
        assert_eq!(json["pomodoroEnabled"], true);
    }

    #[test]
    fn load_missing_key_returns_defaults() {
        let store = MemoryStore::new();
        assert_eq!(SettingsStore::load(&store), Settings::default());
    }

    #[test]
    fn load_reads_saved_record() {
        let store = store_with(
            r#"{"pomodoroEnabled":false,"workMinutes":50,"shortBreakMinutes":10,
                "longBreakMinutes":30,"cyclesBeforeLongBreak":2,
                "autoStartPomodoro":false,"showSeconds":false}"#,
        );
        let s = SettingsStore::load(&store);
        assert!(!s.pomodoro_enabled);
        assert_eq!(s.work_minutes, 50);
        assert_eq!(s.cycles_before_long_break, 2);
        assert!(!s.show_seconds);
    }

    #[test]
    fn load_malformed_json_returns_defaults() {
        let store = store_with("{not json");
        assert_eq!(SettingsStore::load(&store), Settings::default());
    }

    #[test]
    fn load_partial_record_falls_back_wholesale() {
        let store = store_with(r#"{"workMinutes":40}"#);
        assert_eq!(SettingsStore::load(&store), Settings::default());
    }

    #[test]
    fn load_zero_minutes_falls_back_wholesale() {
        let mut bad = serde_json::to_value(Settings::default()).unwrap();
        bad["shortBreakMinutes"] = 0.into();
        let store = store_with(&bad.to_string());
        assert_eq!(SettingsStore::load(&store), Settings::default());
    }

    #[test]
    fn load_storage_error_returns_defaults() {
        assert_eq!(SettingsStore::load(&FailingStore), Settings::default());
    }

    #[test]
    fn update_merges_and_persists() {
        let settings = SettingsStore::open(MemoryStore::new());
        let patch = SettingsPatch {
            work_minutes: Some(30),
            show_seconds: Some(false),
            ..Default::default()
        };

        let updated = settings.update(&patch).unwrap();
        assert_eq!(updated.work_minutes, 30);
        assert!(!updated.show_seconds);
        assert_eq!(updated.short_break_minutes, 5);

        let reloaded = SettingsStore::load(settings.store());
        assert_eq!(reloaded, updated);
    }

    #[test]
    fn update_rejects_zero_and_keeps_state() {
        let settings = SettingsStore::open(MemoryStore::new());
        let patch = SettingsPatch {
            work_minutes: Some(45),
            cycles_before_long_break: Some(0),
            ..Default::default()
        };

        let err = settings.update(&patch).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotPositive {
                field: "cyclesBeforeLongBreak",
                value: 0
            }
        );
        assert_eq!(settings.settings(), Settings::default());
        assert!(settings.store().kv_get(SETTINGS_KEY).unwrap().is_none());
    }

    #[test]
    fn update_survives_failing_store() {
        let settings = SettingsStore::open(FailingStore);
        let patch = SettingsPatch {
            long_break_minutes: Some(20),
            ..Default::default()
        };
        let updated = settings.update(&patch).unwrap();
        assert_eq!(updated.long_break_minutes, 20);
        assert_eq!(settings.settings().long_break_minutes, 20);
    }

    #[test]
    fn subscribers_see_updates() {
        let settings = SettingsStore::open(MemoryStore::new());
        let mut rx = settings.subscribe();
        assert!(!rx.has_changed().unwrap());

        settings
            .update(&SettingsPatch {
                work_minutes: Some(30),
                ..Default::default()
            })
            .unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().work_minutes, 30);
    }

    #[test]
    fn reset_restores_defaults() {
        let settings = SettingsStore::open(MemoryStore::new());
        settings
            .update(&SettingsPatch {
                pomodoro_enabled: Some(false),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(settings.reset(), Settings::default());
        assert_eq!(SettingsStore::load(settings.store()), Settings::default());
    }

    #[test]
    fn from_pair_parses_bool_and_number() {
        let patch = SettingsPatch::from_pair("showSeconds", "false").unwrap();
        assert_eq!(patch.show_seconds, Some(false));

        let patch = SettingsPatch::from_pair("workMinutes", "50").unwrap();
        assert_eq!(patch.work_minutes, Some(50));
    }

    #[test]
    fn from_pair_rejects_bad_input() {
        assert!(matches!(
            SettingsPatch::from_pair("volume", "3"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            SettingsPatch::from_pair("showSeconds", "maybe"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            SettingsPatch::from_pair("workMinutes", "-5"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            SettingsPatch::from_pair("workMinutes", "0"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn get_field_by_key() {
        let s = Settings::default();
        assert_eq!(s.get_field("workMinutes").as_deref(), Some("25"));
        assert_eq!(s.get_field("showSeconds").as_deref(), Some("true"));
        assert!(s.get_field("nope").is_none());
    }
}
