// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Lockbox.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Lockbox configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LockboxConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Directory overrides.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Platform credential store settings.
    #[serde(default)]
    pub keychain: KeychainConfig,

    /// Vault key and store settings.
    #[serde(default)]
    pub vault: VaultConfig,
}

/// Process-wide configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Application directory overrides.
///
/// `None` resolves to the platform directories (`dirs::config_dir()` and
/// `dirs::cache_dir()`, each joined with `lockbox`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory holding the vault. The insecure fallback lives below it.
    #[serde(default)]
    pub settings_dir: Option<String>,

    /// Auxiliary cache directory.
    #[serde(default)]
    pub cache_dir: Option<String>,
}

/// Credential store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeychainConfig {
    /// Service name the vault key is stored under.
    #[serde(default = "default_service")]
    pub service: String,

    /// Account name of the vault key entry.
    #[serde(default = "default_account")]
    pub account: String,

    /// Helper ids in preference order. Empty keeps every helper compiled for
    /// this platform, in platform order.
    #[serde(default)]
    pub helpers: Vec<String>,

    /// Helper used when no preference has been recorded. `None` picks the
    /// first entry of `helpers` (or the platform default).
    #[serde(default)]
    pub default_helper: Option<String>,
}

impl Default for KeychainConfig {
    fn default() -> Self {
        Self {
            service: default_service(),
            account: default_account(),
            helpers: Vec::new(),
            default_helper: None,
        }
    }
}

fn default_service() -> String {
    "lockbox".to_string()
}

fn default_account() -> String {
    "vault-key".to_string()
}

/// What key provisioning does when the presence check itself fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceCheckPolicy {
    /// Treat the failure as a provisioning failure (insecure fallback).
    #[default]
    Fail,
    /// Treat the key as absent and create a new one.
    Create,
}

/// Vault key configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Length in bytes of newly generated vault keys (default: 32, at most 1024).
    #[serde(default = "default_key_len")]
    pub key_len: usize,

    /// Behavior when the keychain presence check fails.
    #[serde(default)]
    pub presence_check: PresenceCheckPolicy,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            key_len: default_key_len(),
            presence_check: PresenceCheckPolicy::default(),
        }
    }
}

/// Smallest accepted key length: 256 bits.
pub const MIN_KEY_LEN: usize = 32;

/// Largest accepted key length.
pub const MAX_KEY_LEN: usize = 1024;

fn default_key_len() -> usize {
    MIN_KEY_LEN
}
