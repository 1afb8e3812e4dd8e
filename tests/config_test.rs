// tests/config_test.rs
use git_reckon::config::{load_config, Config, PreReleasePartKind, CONFIG_FILE_NAME};
use git_reckon::ReckonError;
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_from_explicit_path() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[tags]
prefix = "rel-"

[stages]
pre_release = ["alpha", "beta"]
default_pre_release = "timestamp"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.tags.prefix, "rel-");
    assert_eq!(config.stages.pre_release, vec!["alpha", "beta"]);
    assert_eq!(
        config.stages.default_pre_release,
        PreReleasePartKind::Timestamp
    );
}

#[test]
fn test_missing_explicit_path_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(matches!(
        load_config(Some(missing.to_str().unwrap())),
        Err(ReckonError::Io(_))
    ));
}

#[test]
fn test_malformed_file_is_a_config_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[stages\npre_release = 3").unwrap();
    temp_file.flush().unwrap();

    assert!(matches!(
        load_config(Some(temp_file.path().to_str().unwrap())),
        Err(ReckonError::Config(_))
    ));
}

#[test]
#[serial]
fn test_load_from_current_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[normal]\ndefault_scope = \"major\"\n",
    )
    .unwrap();

    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).expect("Could not change to temp dir");
    let config = load_config(None);
    env::set_current_dir(original_dir).unwrap();

    assert_eq!(
        config.unwrap().normal.default_scope,
        git_reckon::domain::Scope::Major
    );
}

#[test]
fn test_invalid_stage_layout_fails_when_strategy_is_built() {
    let config = Config::from_toml("[stages]\npre_release = [\"rc\", \"beta\"]\n").unwrap();
    assert!(matches!(
        config.stage_strategy(std::sync::Arc::new(|| None)),
        Err(ReckonError::StageOrder { .. })
    ));
}
