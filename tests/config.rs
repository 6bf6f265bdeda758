//! Configuration system tests
//!
//! Tests for config paths, settings persistence and live settings changes.

mod common;

use std::rc::Rc;

use common::{doc_at_end, with_cursor};

use cjk_autopair::config::{
    FileSettings, KeyBindingConfig, MemorySettings, PairingConfig, SettingsStore, TriggerMode,
};
use cjk_autopair::config_paths;
use cjk_autopair::pairing::{ConfigurationError, PairRule, PairingEngine, PairingSession};

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("cjk-autopair"));
    }
}

#[test]
fn test_config_file_ends_with_yaml() {
    if let Some(path) = config_paths::config_file() {
        assert!(path.to_string_lossy().ends_with("config.yaml"));
    }
}

#[test]
fn test_logs_dir_is_under_config_dir() {
    if let (Some(config), Some(logs)) = (config_paths::config_dir(), config_paths::logs_dir()) {
        assert!(logs.starts_with(config));
    }
}

// ========================================================================
// File Settings Tests
// ========================================================================

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = FileSettings::open(dir.path().join("config.yaml"));
    assert_eq!(settings.load_config(), PairingConfig::default());
}

#[test]
fn test_save_then_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");

    let settings = FileSettings::open(&path);
    let config = PairingConfig {
        allow_quote_lookahead: true,
        trigger: TriggerMode::Keycode,
        keys: Some(vec![KeyBindingConfig {
            key: "shift+comma".to_string(),
            opener: '《',
        }]),
        ..PairingConfig::default()
    };
    settings.save_config(&config).unwrap();
    assert!(path.exists());

    let reopened = FileSettings::open(&path);
    assert_eq!(reopened.load_config(), config);
}

#[test]
fn test_saved_value_is_served_until_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    let settings = FileSettings::open(&path);

    let mut config = settings.load_config();
    config.auto_close = false;
    settings.save_config(&config).unwrap();
    assert!(!settings.load_config().auto_close);

    std::fs::write(&path, "auto_close: true\n").unwrap();
    assert!(!settings.load_config().auto_close);
    assert!(FileSettings::open(&path).load_config().auto_close);
}

#[test]
fn test_malformed_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "auto_close: [not, a, bool\n").unwrap();

    let settings = FileSettings::open(&path);
    assert_eq!(settings.load_config(), PairingConfig::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "allow_selection_wrap: false\n").unwrap();

    let config = FileSettings::open(&path).load_config();
    assert!(!config.allow_selection_wrap);
    assert!(config.auto_close);
    assert!(config.delete_collapse);
}

#[test]
fn test_engine_from_file_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "pairs:\n  - opener: 〈\n    closer: 〉\n").unwrap();

    let engine = PairingEngine::new(Rc::new(FileSettings::open(&path))).unwrap();
    let mut doc = doc_at_end("");
    let _session = PairingSession::attach(engine, &mut doc);

    doc.type_text("【");
    doc.type_text("〈");
    assert_eq!(with_cursor(&doc), "【〈|〉");
}

// ========================================================================
// Validation Tests
// ========================================================================

#[test]
fn test_duplicate_chord_is_rejected() {
    let config = PairingConfig {
        keys: Some(vec![
            KeyBindingConfig {
                key: "shift+comma".to_string(),
                opener: '《',
            },
            KeyBindingConfig {
                key: "Shift+Comma".to_string(),
                opener: '【',
            },
        ]),
        ..PairingConfig::default()
    };
    let settings = Rc::new(MemorySettings::new(config));
    assert!(matches!(
        PairingEngine::new(settings),
        Err(ConfigurationError::DuplicateChord(_))
    ));
}

#[test]
fn test_chord_for_unknown_opener_is_rejected() {
    let config = PairingConfig {
        keys: Some(vec![KeyBindingConfig {
            key: "bracketleft".to_string(),
            opener: '<',
        }]),
        ..PairingConfig::default()
    };
    let settings = Rc::new(MemorySettings::new(config));
    assert_eq!(
        PairingEngine::new(settings).unwrap_err(),
        ConfigurationError::UnknownOpener('<')
    );
}

#[test]
fn test_closer_reused_as_opener_is_rejected() {
    let config = PairingConfig {
        pairs: Some(vec![PairRule::new('【', '】'), PairRule::new('】', '〗')]),
        ..PairingConfig::default()
    };
    let settings = Rc::new(MemorySettings::new(config));
    assert!(PairingEngine::new(settings).is_err());
}

// ========================================================================
// Live Settings Tests
// ========================================================================

#[test]
fn test_toggles_are_read_per_event() {
    let settings = Rc::new(MemorySettings::default());
    let engine = PairingEngine::new(settings.clone()).unwrap();
    let mut doc = doc_at_end("");
    let _session = PairingSession::attach(engine, &mut doc);

    doc.type_text("【");
    assert_eq!(doc.text(), "【】");

    let mut config = settings.load_config();
    config.auto_close = false;
    settings.save_config(&config).unwrap();

    doc.type_text("《");
    assert_eq!(with_cursor(&doc), "【《|】");
}

#[test]
fn test_enabling_lookahead_at_runtime() {
    let settings = Rc::new(MemorySettings::default());
    let engine = PairingEngine::new(settings.clone()).unwrap();
    let mut doc = doc_at_end("");
    let _session = PairingSession::attach(engine, &mut doc);

    let mut config = settings.load_config();
    config.allow_quote_lookahead = true;
    settings.save_config(&config).unwrap();

    doc.type_text("\u{201D}");
    assert_eq!(doc.text(), "\u{201C}\u{201D}");
}
