//! Pairing configuration and its persistence
//!
//! Stored as YAML in `~/.config/cjk-autopair/config.yaml`. The engine reads
//! the current value through a [`SettingsStore`] on every edit event, so a
//! change saved by the host takes effect on the next keystroke.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::pairing::{ConfigurationError, KeyChord, KeycodeTable, PairRule, PairingTable};

/// Which signal decides that a pairing trigger fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// The committed text is an opener (quote lookahead available)
    #[default]
    Symbol,
    /// A key chord from the keycode table armed the pair
    Keycode,
}

/// A chord → opener binding as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindingConfig {
    /// e.g. "shift+comma"
    pub key: String,
    pub opener: char,
}

/// Pairing preferences that persist across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingConfig {
    /// Wrap the selection when an opener is typed over it
    #[serde(default = "default_true")]
    pub allow_selection_wrap: bool,

    /// Promote a bare closing quote to a full quote pair
    #[serde(default)]
    pub allow_quote_lookahead: bool,

    #[serde(default = "default_true")]
    pub auto_close: bool,

    #[serde(default = "default_true")]
    pub delete_collapse: bool,

    #[serde(default)]
    pub trigger: TriggerMode,

    /// Replaces the built-in pairing table when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pairs: Option<Vec<PairRule>>,

    /// Replaces the built-in keycode layout when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<KeyBindingConfig>>,
}

fn default_true() -> bool {
    true
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            allow_selection_wrap: true,
            allow_quote_lookahead: false,
            auto_close: true,
            delete_collapse: true,
            trigger: TriggerMode::Symbol,
            pairs: None,
            keys: None,
        }
    }
}

impl PairingConfig {
    /// Build the pairing table this config describes
    pub fn pairing_table(&self) -> Result<PairingTable, ConfigurationError> {
        match &self.pairs {
            Some(rules) => PairingTable::new(rules.iter().copied()),
            None => Ok(PairingTable::default_cjk()),
        }
    }

    /// Build the keycode table this config describes, checked against `pairs`
    pub fn keycode_table(&self, pairs: &PairingTable) -> Result<KeycodeTable, ConfigurationError> {
        let Some(keys) = &self.keys else {
            return Ok(KeycodeTable::default_pinyin(pairs));
        };

        let bindings = keys
            .iter()
            .map(|binding| Ok((binding.key.parse::<KeyChord>()?, binding.opener)))
            .collect::<Result<Vec<_>, ConfigurationError>>()?;
        KeycodeTable::new(bindings, pairs)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse pairing config")
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize pairing config")
    }

    /// Load config from the default location, or defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {:#}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }

        std::fs::write(path, self.to_yaml()?)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}

/// The host's settings collaborator.
pub trait SettingsStore {
    /// Current configuration value
    fn load_config(&self) -> PairingConfig;

    fn save_config(&self, config: &PairingConfig) -> Result<()>;
}

/// Settings held in memory only.
#[derive(Debug, Default)]
pub struct MemorySettings {
    current: RefCell<PairingConfig>,
}

impl MemorySettings {
    pub fn new(config: PairingConfig) -> Self {
        Self {
            current: RefCell::new(config),
        }
    }
}

impl SettingsStore for MemorySettings {
    fn load_config(&self) -> PairingConfig {
        self.current.borrow().clone()
    }

    fn save_config(&self, config: &PairingConfig) -> Result<()> {
        *self.current.borrow_mut() = config.clone();
        Ok(())
    }
}

/// Settings backed by a YAML file.
///
/// The file is parsed on open and the value is kept in memory. Every
/// `load_config` (the engine calls it per edit event) returns that value, and
/// `save_config` updates it and writes the file. Changes made to the file by
/// anything other than `save_config` are not seen until the store is reopened.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    current: RefCell<PairingConfig>,
}

impl FileSettings {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = RefCell::new(PairingConfig::load_from(&path));
        Self { path, current }
    }

    /// Open `~/.config/cjk-autopair/config.yaml`
    pub fn open_default() -> Result<Self> {
        let path = crate::config_paths::config_file()
            .context("No config directory available")?;
        Ok(Self::open(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettings {
    fn load_config(&self) -> PairingConfig {
        self.current.borrow().clone()
    }

    fn save_config(&self, config: &PairingConfig) -> Result<()> {
        config.save_to(&self.path)?;
        *self.current.borrow_mut() = config.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PairingConfig::default();
        assert!(config.allow_selection_wrap);
        assert!(!config.allow_quote_lookahead);
        assert!(config.auto_close);
        assert!(config.delete_collapse);
        assert_eq!(config.trigger, TriggerMode::Symbol);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = PairingConfig::from_yaml("allow_quote_lookahead: true\n").unwrap();
        assert!(config.allow_quote_lookahead);
        assert!(config.allow_selection_wrap);
        assert!(config.pairs.is_none());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let config = PairingConfig::from_yaml("theme: dark\nauto_close: false\n").unwrap();
        assert!(!config.auto_close);
    }

    #[test]
    fn test_trigger_mode_is_lowercase() {
        let config = PairingConfig::from_yaml("trigger: keycode\n").unwrap();
        assert_eq!(config.trigger, TriggerMode::Keycode);
        assert!(PairingConfig::from_yaml("trigger: Keycode\n").is_err());
    }

    #[test]
    fn test_custom_pairs() {
        let yaml = "pairs:\n  - opener: 【\n    closer: 】\n";
        let config = PairingConfig::from_yaml(yaml).unwrap();
        let table = config.pairing_table().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup_by_opener('【'), Some(PairRule::new('【', '】')));
    }

    #[test]
    fn test_invalid_pairs_surface_configuration_error() {
        let yaml = "pairs:\n  - opener: 【\n    closer: 】\n  - opener: 【\n    closer: 〗\n";
        let config = PairingConfig::from_yaml(yaml).unwrap();
        assert_eq!(
            config.pairing_table().unwrap_err(),
            ConfigurationError::DuplicateOpener('【')
        );
    }

    #[test]
    fn test_custom_keys() {
        let yaml = "keys:\n  - key: shift+period\n    opener: 〈\n";
        let config = PairingConfig::from_yaml(yaml).unwrap();
        let pairs = config.pairing_table().unwrap();
        let keys = config.keycode_table(&pairs).unwrap();
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn test_bad_key_name_is_rejected() {
        let yaml = "keys:\n  - key: ctrl+q\n    opener: 【\n";
        let config = PairingConfig::from_yaml(yaml).unwrap();
        let pairs = config.pairing_table().unwrap();
        assert!(matches!(
            config.keycode_table(&pairs),
            Err(ConfigurationError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_memory_settings_round_trip() {
        let settings = MemorySettings::default();
        let mut config = settings.load_config();
        config.allow_selection_wrap = false;
        settings.save_config(&config).unwrap();
        assert!(!settings.load_config().allow_selection_wrap);
    }
}
