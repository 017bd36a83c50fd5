//! Configuration loading and management
//!
//! Handles parsing of `toolbelt.toml` in the data directory.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::password::CharClass;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Password generator defaults
    #[serde(default)]
    pub password: PasswordConfig,

    /// Rock-paper-scissors settings
    #[serde(default)]
    pub rps: RpsConfig,

    /// Calculator settings
    #[serde(default)]
    pub calc: CalcConfig,
}

/// Password generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    /// Length used when `pass gen` gets no `--length`
    #[serde(default = "default_password_length")]
    pub default_length: usize,

    /// Character classes enabled by default
    #[serde(default = "default_classes")]
    pub classes: Vec<CharClass>,

    /// Strip 1, l, I, 0, O from the alphabet by default
    #[serde(default = "default_true")]
    pub avoid_similar: bool,

    /// Full redraws allowed before generation gives up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Keep generated passwords in the history log
    #[serde(default = "default_true")]
    pub record_history: bool,

    /// Entries shown by `pass history`
    #[serde(default = "default_history_display")]
    pub history_display: usize,
}

fn default_password_length() -> usize {
    12
}

fn default_classes() -> Vec<CharClass> {
    CharClass::ALL.to_vec()
}

fn default_true() -> bool {
    true
}

fn default_max_attempts() -> u32 {
    10_000
}

fn default_history_display() -> usize {
    10
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            default_length: default_password_length(),
            classes: default_classes(),
            avoid_similar: true,
            max_attempts: default_max_attempts(),
            record_history: true,
            history_display: default_history_display(),
        }
    }
}

/// Rock-paper-scissors configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpsConfig {
    /// Rounds kept in the history log
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,
}

fn default_history_cap() -> usize {
    10
}

impl Default for RpsConfig {
    fn default() -> Self {
        Self {
            history_cap: default_history_cap(),
        }
    }
}

/// Calculator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalcConfig {
    /// Characters of the current entry shown on the display
    #[serde(default = "default_display_width")]
    pub display_width: usize,
}

fn default_display_width() -> usize {
    11
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            display_width: default_display_width(),
        }
    }
}

impl Config {
    /// Load configuration from a `toolbelt.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    ///
    /// An unreadable or invalid file falls back to defaults with a warning.
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = data_dir.join(crate::storage::CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.password.validate()?;
        self.rps.validate()?;
        self.calc.validate()?;
        Ok(())
    }
}

impl PasswordConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if !(crate::password::MIN_LENGTH..=crate::password::MAX_LENGTH)
            .contains(&self.default_length)
        {
            return Err(crate::error::Error::InvalidConfig(format!(
                "password.default_length must be between {} and {}",
                crate::password::MIN_LENGTH,
                crate::password::MAX_LENGTH
            )));
        }
        if self.classes.is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "password.classes cannot be empty".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "password.max_attempts must be > 0".to_string(),
            ));
        }
        if self.history_display == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "password.history_display must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl RpsConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.history_cap == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "rps.history_cap must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl CalcConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.display_width == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "calc.display_width must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.password.default_length, 12);
        assert_eq!(cfg.password.classes, CharClass::ALL.to_vec());
        assert!(cfg.password.avoid_similar);
        assert_eq!(cfg.password.max_attempts, 10_000);
        assert!(cfg.password.record_history);
        assert_eq!(cfg.password.history_display, 10);
        assert_eq!(cfg.rps.history_cap, 10);
        assert_eq!(cfg.calc.display_width, 11);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("toolbelt.toml");
        let content = r#"
[password]
default_length = 20
classes = ["lowercase", "digit"]
avoid_similar = false
max_attempts = 50
record_history = false
history_display = 3

[rps]
history_cap = 25

[calc]
display_width = 16
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.password.default_length, 20);
        assert_eq!(
            cfg.password.classes,
            vec![CharClass::Lowercase, CharClass::Digit]
        );
        assert!(!cfg.password.avoid_similar);
        assert_eq!(cfg.password.max_attempts, 50);
        assert!(!cfg.password.record_history);
        assert_eq!(cfg.password.history_display, 3);
        assert_eq!(cfg.rps.history_cap, 25);
        assert_eq!(cfg.calc.display_width, 16);
    }

    #[test]
    fn out_of_range_length_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("toolbelt.toml");
        fs::write(&path, "[password]\ndefault_length = 4").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            crate::error::Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn zero_history_cap_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("toolbelt.toml");
        fs::write(&path, "[rps]\nhistory_cap = 0").expect("write config");

        assert!(matches!(
            Config::load(&path),
            Err(crate::error::Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn load_from_dir_defaults_when_missing_or_invalid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from_dir(dir.path());
        assert_eq!(cfg.password.default_length, 12);

        fs::write(dir.path().join("toolbelt.toml"), "password = [nope").expect("write config");
        let cfg = Config::load_from_dir(dir.path());
        assert_eq!(cfg.password.default_length, 12);
    }
}
