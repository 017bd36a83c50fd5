use std::fs;

use toolbelt::config::Config;
use toolbelt::password::CharClass;

#[test]
fn config_defaults_when_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::load_from_dir(dir.path());

    assert_eq!(config.password.default_length, 12);
    assert_eq!(config.password.classes, CharClass::ALL.to_vec());
    assert!(config.password.avoid_similar);
    assert!(config.password.record_history);
    assert_eq!(config.password.history_display, 10);
    assert_eq!(config.rps.history_cap, 10);
    assert_eq!(config.calc.display_width, 11);
}

#[test]
fn config_overrides_from_toml() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let toml = r#"
[password]
default_length = 20
classes = ["uppercase", "symbol"]
avoid_similar = false
record_history = false

[rps]
history_cap = 3
"#;
    fs::write(dir.path().join("toolbelt.toml"), toml)?;

    let config = Config::load_from_dir(dir.path());
    assert_eq!(config.password.default_length, 20);
    assert_eq!(
        config.password.classes,
        vec![CharClass::Uppercase, CharClass::Symbol]
    );
    assert!(!config.password.avoid_similar);
    assert!(!config.password.record_history);
    assert_eq!(config.password.max_attempts, 10_000);
    assert_eq!(config.rps.history_cap, 3);
    assert_eq!(config.calc.display_width, 11);

    Ok(())
}

#[test]
fn config_load_rejects_out_of_range_length() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("toolbelt.toml");
    fs::write(&path, "[password]\ndefault_length = 4\n")?;

    let err = Config::load(&path).expect_err("length below minimum");
    assert_eq!(err.exit_code(), 2);

    let fallback = Config::load_from_dir(dir.path());
    assert_eq!(fallback.password.default_length, 12);

    Ok(())
}
