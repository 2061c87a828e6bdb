use formscope::config::{Settings, SettingsError};
use formscope::odata::NanLiteral;

#[test]
fn test_parse_full_settings() {
    let settings = Settings::from_toml(
        r#"
        [resolver]
        single_flight = false

        [compiler]
        nan_literal = "drop"

        [catalog]
        path = "./catalog.json"
        "#,
    )
    .unwrap();

    assert!(!settings.resolver.single_flight);
    assert_eq!(settings.compiler.nan_literal, NanLiteral::Drop);
    assert_eq!(
        settings.catalog_path().unwrap(),
        Some(std::path::PathBuf::from("./catalog.json"))
    );

    assert_eq!(settings.compile_options().nan_literal, NanLiteral::Drop);
    assert!(!settings.resolver_options().single_flight);
}

#[test]
fn test_partial_settings_use_defaults() {
    let settings = Settings::from_toml("[compiler]\n").unwrap();
    assert!(settings.resolver.single_flight);
    assert_eq!(settings.compiler.nan_literal, NanLiteral::Emit);
    assert_eq!(settings.catalog_path().unwrap(), None);
}

#[test]
fn test_invalid_nan_literal() {
    let err = Settings::from_toml("[compiler]\nnan_literal = \"maybe\"\n").unwrap_err();
    assert!(matches!(err, SettingsError::ParseError(_)));
}

#[test]
fn test_missing_file() {
    let err = Settings::from_file("/nonexistent/formscope.toml").unwrap_err();
    assert!(matches!(err, SettingsError::FileNotFound(_)));
}

#[test]
fn test_catalog_path_missing_env_var() {
    let settings =
        Settings::from_toml("[catalog]\npath = \"${FORMSCOPE_UNSET_CATALOG_DIR}/c.json\"\n")
            .unwrap();
    assert!(matches!(
        settings.catalog_path(),
        Err(SettingsError::MissingEnvVar(_))
    ));
}
