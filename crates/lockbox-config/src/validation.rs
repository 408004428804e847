// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as minimum key lengths, non-empty account names and consistent helper
//! preferences.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::{LockboxConfig, MAX_KEY_LEN, MIN_KEY_LEN};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &LockboxConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.app.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.app.log_level
            ),
        });
    }

    for (name, value) in [
        ("paths.settings_dir", &config.paths.settings_dir),
        ("paths.cache_dir", &config.paths.cache_dir),
    ] {
        if let Some(dir) = value {
            if dir.trim().is_empty() {
                errors.push(ConfigError::Validation {
                    message: format!("{name} must not be empty when set"),
                });
            }
        }
    }

    if config.keychain.service.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "keychain.service must not be empty".to_string(),
        });
    }

    if config.keychain.account.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "keychain.account must not be empty".to_string(),
        });
    }

    let mut seen_helpers = HashSet::new();
    for helper in &config.keychain.helpers {
        if !seen_helpers.insert(helper.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate helper `{helper}` in keychain.helpers"),
            });
        }
    }

    if let Some(default) = &config.keychain.default_helper {
        if !config.keychain.helpers.is_empty() && !seen_helpers.contains(default.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "keychain.default_helper `{default}` is not listed in keychain.helpers"
                ),
            });
        }
    }

    if config.vault.key_len < MIN_KEY_LEN {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.key_len must be at least {MIN_KEY_LEN} (256 bits), got {}",
                config.vault.key_len
            ),
        });
    }

    if config.vault.key_len > MAX_KEY_LEN {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.key_len must be at most {MAX_KEY_LEN}, got {}",
                config.vault.key_len
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = LockboxConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn short_key_fails_validation() {
        let mut config = LockboxConfig::default();
        config.vault.key_len = 16;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "vault.key_len"));
    }

    #[test]
    fn oversized_key_fails_validation() {
        let mut config = LockboxConfig::default();
        config.vault.key_len = usize::MAX;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "at most 1024"));

        config.vault.key_len = MAX_KEY_LEN;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_account_fails_validation() {
        let mut config = LockboxConfig::default();
        config.keychain.account = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "keychain.account"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = LockboxConfig::default();
        config.app.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "app.log_level"));
    }

    #[test]
    fn duplicate_helpers_fail_validation() {
        let mut config = LockboxConfig::default();
        config.keychain.helpers = vec!["secret-service".into(), "secret-service".into()];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "duplicate helper"));
    }

    #[test]
    fn default_helper_must_be_listed() {
        let mut config = LockboxConfig::default();
        config.keychain.helpers = vec!["secret-service".into()];
        config.keychain.default_helper = Some("wincred".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "keychain.default_helper"));
    }

    #[test]
    fn default_helper_without_list_is_accepted() {
        let mut config = LockboxConfig::default();
        config.keychain.default_helper = Some("secret-service".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = LockboxConfig::default();
        config.vault.key_len = 8;
        config.keychain.service = String::new();
        config.paths.cache_dir = Some(String::new());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
