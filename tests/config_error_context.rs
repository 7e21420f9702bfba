//! Tests for config error context preservation
//!
//! Verifies that configuration errors keep the underlying std::io::Error
//! and toml::de::Error as their source, and that validation failures name
//! the offending file and field.

use modelgate::config::Config;
use modelgate::error::AppError;
use std::error::Error;
use std::str::FromStr;
use tempfile::TempDir;

#[test]
fn test_config_file_read_error_preserves_io_error() {
    let result = Config::from_file("/nonexistent/path/to/modelgate.toml");

    let err = result.expect_err("Reading nonexistent file should fail");

    let err_string = err.to_string();
    assert!(
        err_string.contains("/nonexistent/path/to/modelgate.toml"),
        "Error should include the file path, got: {}",
        err_string
    );

    let source = err.source().expect("Should have source error");
    let io_err = source
        .downcast_ref::<std::io::Error>()
        .expect("Source error should be io::Error");
    assert_eq!(io_err.kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn test_config_parse_error_preserves_toml_error() {
    let invalid_toml = r#"
this is [[[[ not valid toml
it has {{{{ broken syntax
"#;

    let err = Config::from_str(invalid_toml).expect_err("Parsing invalid TOML should fail");

    let source = err.source().expect("Should have source error");
    assert!(
        source.is::<toml::de::Error>(),
        "Source error should be toml::de::Error, got: {:?}",
        source
    );
    assert!(
        err.to_string().contains("TOML"),
        "Error should indicate TOML parsing failure, got: {}",
        err
    );
}

#[test]
fn test_wrong_field_type_is_parse_error() {
    let err = Config::from_str("[server]\nport = \"five thousand\"\n").unwrap_err();
    assert!(matches!(err, AppError::ConfigParseFailed { .. }), "got: {:?}", err);
}

#[test]
fn test_validation_error_names_file_and_field() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("modelgate.toml");
    std::fs::write(
        &config_path,
        "[upstream]\nurl = \"ftp://example.com/chat\"\n",
    )
    .unwrap();

    let err = Config::from_file(&config_path).unwrap_err();

    match &err {
        AppError::ConfigValidationFailed { path, reason } => {
            assert!(path.ends_with("modelgate.toml"), "got path: {}", path);
            assert!(reason.contains("upstream.url"), "got reason: {}", reason);
        }
        other => panic!("Expected ConfigValidationFailed, got: {:?}", other),
    }
}

#[test]
fn test_zero_timeout_is_rejected() {
    let result = Config::from_str("[upstream]\ncompletion_timeout_seconds = 0\n");
    let err = result.expect_err("Zero timeout should fail validation");
    assert!(
        err.to_string().contains("completion_timeout_seconds"),
        "got: {}",
        err
    );
}

#[test]
fn test_invalid_port_env_override_is_config_error() {
    let mut config = Config::default();
    let err = config
        .apply_env_with(|name| (name == "PORT").then(|| "http".to_string()))
        .unwrap_err();

    assert!(matches!(err, AppError::Config(_)), "got: {:?}", err);
    assert!(err.to_string().contains("PORT"));
}
