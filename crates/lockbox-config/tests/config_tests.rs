// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Lockbox configuration system.

use std::path::Path;

use figment::Jail;
use lockbox_config::diagnostic::ConfigError;
use lockbox_config::model::{LockboxConfig, PresenceCheckPolicy};
use lockbox_config::{load_and_validate_str, load_config_from_path, load_config_from_str};
use serial_test::serial;

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_lockbox_config() {
    let toml = r#"
[app]
log_level = "debug"

[paths]
settings_dir = "/var/lib/lockbox"
cache_dir = "/var/cache/lockbox"

[keychain]
service = "com.example.lockbox"
account = "primary-key"
helpers = ["secret-service", "keyutils"]
default_helper = "secret-service"

[vault]
key_len = 64
presence_check = "create"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.paths.settings_dir.as_deref(), Some("/var/lib/lockbox"));
    assert_eq!(config.paths.cache_dir.as_deref(), Some("/var/cache/lockbox"));
    assert_eq!(config.keychain.service, "com.example.lockbox");
    assert_eq!(config.keychain.account, "primary-key");
    assert_eq!(config.keychain.helpers, vec!["secret-service", "keyutils"]);
    assert_eq!(config.keychain.default_helper.as_deref(), Some("secret-service"));
    assert_eq!(config.vault.key_len, 64);
    assert_eq!(config.vault.presence_check, PresenceCheckPolicy::Create);
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.app.log_level, "info");
    assert!(config.paths.settings_dir.is_none());
    assert!(config.paths.cache_dir.is_none());
    assert_eq!(config.keychain.service, "lockbox");
    assert_eq!(config.keychain.account, "vault-key");
    assert_eq!(config.vault.key_len, 32);
    assert_eq!(config.vault.presence_check, PresenceCheckPolicy::Fail);
}

/// Unknown field in [keychain] is rejected.
#[test]
fn unknown_field_in_keychain_produces_error() {
    let toml = r#"
[keychain]
acount = "x"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("acount"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Unknown presence check policy is rejected.
#[test]
fn unknown_presence_policy_is_rejected() {
    let toml = r#"
[vault]
presence_check = "retry"
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[tls]
cert = "bridge.pem"
"#;

    let err = load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("tls"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Unknown key produces an UnknownKey diagnostic with a suggestion and the valid keys.
#[test]
fn diagnostic_error_includes_suggestion_and_valid_keys() {
    let toml = r#"
[keychain]
defualt_helper = "wincred"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "defualt_helper"
                && suggestion.as_deref() == Some("default_helper")
                && valid_keys.contains("account")
        })
    });
    assert!(found, "expected UnknownKey with suggestion, got: {errors:?}");
}

/// Invalid type (string where number expected) produces an InvalidType diagnostic.
#[test]
fn diagnostic_invalid_type_names_the_key() {
    let toml = r#"
[vault]
key_len = "long"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors.iter().any(|e| matches!(e, ConfigError::InvalidType { .. })
            || e.to_string().contains("key_len")),
        "got: {errors:?}"
    );
}

/// ConfigError can be rendered using miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "acount".to_string(),
        suggestion: Some("account".to_string()),
        valid_keys: "service, account, helpers, default_helper".to_string(),
        span: None,
        src: None,
    };
    assert!(error.code().is_some());
    let help = error.help().expect("help text").to_string();
    assert!(help.contains("did you mean `account`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("acount"));
}

/// Validation runs after deserialization.
#[test]
fn validation_catches_short_key() {
    let toml = r#"
[vault]
key_len = 16
"#;

    let errors = load_and_validate_str(toml).expect_err("short key should fail");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("vault.key_len"))
    ));
}

#[test]
fn validation_catches_oversized_key() {
    let toml = r#"
[vault]
key_len = 9223372036854775807
"#;

    let errors = load_and_validate_str(toml).expect_err("oversized key should fail");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("at most"))
    ));
}

/// LOCKBOX_KEYCHAIN_DEFAULT_HELPER maps to keychain.default_helper, not keychain.default.helper.
#[test]
#[serial]
fn env_var_overrides_underscore_keys() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "lockbox.toml",
            r#"
[keychain]
account = "from-toml"
"#,
        )?;
        jail.set_env("LOCKBOX_KEYCHAIN_DEFAULT_HELPER", "wincred");
        jail.set_env("LOCKBOX_VAULT_PRESENCE_CHECK", "create");

        let config = load_config_from_path(Path::new("lockbox.toml"))?;
        assert_eq!(config.keychain.account, "from-toml");
        assert_eq!(config.keychain.default_helper.as_deref(), Some("wincred"));
        assert_eq!(config.vault.presence_check, PresenceCheckPolicy::Create);
        Ok(())
    });
}

/// Env vars override values from the TOML file.
#[test]
#[serial]
fn env_var_beats_file() {
    Jail::expect_with(|jail| {
        jail.create_file("lockbox.toml", "[app]\nlog_level = \"warn\"\n")?;
        jail.set_env("LOCKBOX_APP_LOG_LEVEL", "trace");

        let config = load_config_from_path(Path::new("lockbox.toml"))?;
        assert_eq!(config.app.log_level, "trace");
        Ok(())
    });
}

/// Missing config files are silently skipped.
#[test]
#[serial]
fn missing_config_file_is_skipped() {
    let config = load_config_from_path(Path::new("/nonexistent/path/lockbox.toml"))
        .expect("missing file should be silently skipped");
    assert_eq!(config.keychain.service, LockboxConfig::default().keychain.service);
}

/// A config file on disk is loaded and validated.
#[test]
#[serial]
fn load_and_validate_path_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lockbox.toml");
    std::fs::write(&path, "[keychain]\nservice = \"on-disk\"\n").unwrap();

    let config = lockbox_config::load_and_validate_path(&path).expect("file should validate");
    assert_eq!(config.keychain.service, "on-disk");
}
