#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn test_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.user, "local");
    assert_eq!(config.log_filter, "warn");
    assert!(config.database_path.is_none());
    assert_eq!(config.display.decimals, 2);
    assert_eq!(config.display.currency_symbol, "$");
}

#[test]
fn test_empty_file_is_default() {
    assert_eq!(AppConfig::parse("").unwrap(), AppConfig::default());
}

#[test]
fn test_partial_config() {
    let config = AppConfig::parse(
        r#"
        user = "maria"

        [display]
        decimals = 0
        currency_symbol = "€"
        "#,
    )
    .unwrap();
    assert_eq!(config.user, "maria");
    assert_eq!(config.display.decimals, 0);
    assert_eq!(config.display.currency_symbol, "€");
    // Untouched fields keep their defaults
    assert_eq!(config.display.thousands_separator, ",");
    assert_eq!(config.log_filter, "warn");
}

#[test]
fn test_database_path_override() {
    let config = AppConfig::parse(r#"database_path = "/tmp/budget.db""#).unwrap();
    assert_eq!(
        config.database_path().unwrap(),
        PathBuf::from("/tmp/budget.db")
    );
}

#[test]
fn test_rejects_too_many_decimals() {
    let err = AppConfig::parse("[display]\ndecimals = 9").unwrap_err();
    assert!(err.to_string().contains("decimals"));
}

#[test]
fn test_rejects_empty_user() {
    assert!(AppConfig::parse(r#"user = "  ""#).is_err());
}

#[test]
fn test_rejects_bad_toml() {
    let err = AppConfig::parse("user = ").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "log_filter = \"debug\"\n").unwrap();
    let config = AppConfig::load(&path).unwrap();
    assert_eq!(config.log_filter, "debug");
}

#[test]
fn test_load_or_default_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::load_or_default(&dir.path().join("nope.toml")).unwrap();
    assert_eq!(config, AppConfig::default());
}
