// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key provisioning: find the vault key in the credential store or create it.

use std::path::Path;

use lockbox_config::model::{LockboxConfig, MAX_KEY_LEN, MIN_KEY_LEN, PresenceCheckPolicy};
use lockbox_core::{LockboxError, VaultKey};
use lockbox_keychain::{Keychain, KeychainList, read_helper_preference, write_helper_preference};
use tracing::{debug, info, warn};

/// Inputs to [`provision_key`] besides the helper registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSettings {
    pub service: String,
    pub account: String,
    pub key_len: usize,
    pub presence_check: PresenceCheckPolicy,
}

impl Default for ProvisionSettings {
    fn default() -> Self {
        Self::from_config(&LockboxConfig::default())
    }
}

impl ProvisionSettings {
    pub fn from_config(config: &LockboxConfig) -> Self {
        Self {
            service: config.keychain.service.clone(),
            account: config.keychain.account.clone(),
            key_len: config.vault.key_len.clamp(MIN_KEY_LEN, MAX_KEY_LEN),
            presence_check: config.vault.presence_check,
        }
    }
}

/// Ensure a vault key exists in the selected credential store and return it.
///
/// The helper is chosen from the preference recorded in `vault_dir`, falling
/// back to the registry default. An existing key is always reused; a key that
/// exists but cannot be loaded yields [`LockboxError::KeyUnreadable`] and no
/// replacement is generated. A failure while creating a missing key is always
/// fallback-eligible. Every other failure is returned as-is and is classified
/// by [`LockboxError::allows_insecure_fallback`].
pub fn provision_key(
    vault_dir: &Path,
    keychains: &KeychainList,
    settings: &ProvisionSettings,
) -> Result<VaultKey, LockboxError> {
    let recorded = read_helper_preference(vault_dir)?;
    let keychain = Keychain::select(recorded.as_deref(), keychains, &settings.service)?;
    let account = settings.account.as_str();

    let present = match keychain.has_secret(account) {
        Ok(present) => present,
        Err(e) if settings.presence_check == PresenceCheckPolicy::Create => {
            warn!(
                helper = keychain.helper_name(),
                error = %e,
                "keychain presence check failed; treating vault key as absent"
            );
            false
        }
        Err(e) => return Err(e),
    };

    let key = if present {
        let key = keychain
            .get_secret(account)
            .map_err(|source| LockboxError::KeyUnreadable {
                account: account.to_string(),
                source: Box::new(source),
            })?;
        debug!(helper = keychain.helper_name(), account, "loaded existing vault key");
        key
    } else {
        let len = settings.key_len.clamp(MIN_KEY_LEN, MAX_KEY_LEN);
        let key = keychain
            .create_secret(account, len)
            .map_err(creation_failure)?;
        info!(helper = keychain.helper_name(), account, "generated new vault key");
        key
    };

    if recorded.is_none() {
        if let Err(e) = write_helper_preference(vault_dir, keychain.helper_name()) {
            warn!(helper = keychain.helper_name(), error = %e, "could not record keychain helper");
        }
    }

    Ok(key)
}

/// No key exists yet, so any failure to create one leaves the insecure
/// fallback open.
fn creation_failure(err: LockboxError) -> LockboxError {
    if err.allows_insecure_fallback() {
        err
    } else {
        LockboxError::backend("could not create vault key", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockbox_core::ErrorKind;
    use lockbox_test_utils::{Failure, MockHelper};

    fn settings() -> ProvisionSettings {
        ProvisionSettings::default()
    }

    #[test]
    fn settings_clamp_short_keys() {
        let mut config = LockboxConfig::default();
        config.vault.key_len = 8;
        assert_eq!(ProvisionSettings::from_config(&config).key_len, MIN_KEY_LEN);
    }

    #[test]
    fn settings_clamp_oversized_keys() {
        let mut config = LockboxConfig::default();
        config.vault.key_len = usize::MAX;
        assert_eq!(ProvisionSettings::from_config(&config).key_len, MAX_KEY_LEN);
    }

    #[test]
    fn fresh_install_creates_and_records() {
        let dir = tempfile::tempdir().unwrap();
        let mock = MockHelper::new("mock");
        let list = KeychainList::new().with_helper(mock.clone());

        let key = provision_key(dir.path(), &list, &settings()).unwrap();
        assert_eq!(key.len(), 32);
        assert_eq!(mock.entry_count(), 1);
        assert_eq!(
            read_helper_preference(dir.path()).unwrap().as_deref(),
            Some("mock")
        );
    }

    #[test]
    fn presence_failure_is_fatal_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let mock = MockHelper::new("mock").failing_has(Failure::Unreachable);
        let list = KeychainList::new().with_helper(mock.clone());

        let err = provision_key(dir.path(), &list, &settings()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialBackendError);
        assert_eq!(mock.calls().set, 0);
    }

    #[test]
    fn presence_failure_with_create_policy_creates() {
        let dir = tempfile::tempdir().unwrap();
        let mock = MockHelper::new("mock").failing_has(Failure::Denied);
        let list = KeychainList::new().with_helper(mock.clone());
        let settings = ProvisionSettings {
            presence_check: PresenceCheckPolicy::Create,
            ..settings()
        };

        provision_key(dir.path(), &list, &settings).unwrap();
        assert_eq!(mock.calls().set, 1);
    }

    #[test]
    fn unwritable_preference_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // A directory squatting on the temp file name makes the write fail.
        std::fs::create_dir(dir.path().join("keychain_state.json.tmp")).unwrap();
        let mock = MockHelper::new("mock");
        let list = KeychainList::new().with_helper(mock.clone());

        provision_key(dir.path(), &list, &settings()).unwrap();
        assert_eq!(mock.entry_count(), 1);
        assert_eq!(read_helper_preference(dir.path()).unwrap(), None);
    }
}
