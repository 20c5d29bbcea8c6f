use clap::Subcommand;
use focusmocus_core::{Database, Settings, SettingsPatch, SettingsStore};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a setting
    Get {
        /// Setting key (e.g. "workMinutes", "showSeconds")
        key: String,
    },
    /// Set a setting
    Set {
        /// Setting key
        key: String,
        /// New value (true/false or a positive integer)
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let settings = SettingsStore::open(Database::open()?);

    match action {
        ConfigAction::Get { key } => match settings.settings().get_field(&key) {
            Some(value) => println!("{value}"),
            None => return Err(unknown_key(&key).into()),
        },
        ConfigAction::Set { key, value } => {
            let patch = SettingsPatch::from_pair(&key, &value)?;
            settings.update(&patch)?;
            println!("ok");
        }
        ConfigAction::List => {
            let json = serde_json::to_string_pretty(&settings.settings())?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            settings.reset();
            println!("settings reset to defaults");
        }
    }
    Ok(())
}

fn unknown_key(key: &str) -> String {
    let known = serde_json::to_value(Settings::default())
        .ok()
        .and_then(|v| v.as_object().map(|o| o.keys().cloned().collect::<Vec<_>>()))
        .unwrap_or_default();
    format!("unknown config key: {key} (known: {})", known.join(", "))
}
