// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The selected credential helper, bound to a service name.
//!
//! Key material crosses the helper boundary as standard base64 so that any
//! helper restricted to UTF-8 passwords can hold arbitrary key bytes.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use zeroize::Zeroizing;

use lockbox_core::{CredentialHelper, LockboxError, VaultKey};

use crate::list::KeychainList;

/// A credential helper chosen for this installation.
#[derive(Clone)]
pub struct Keychain {
    helper: Arc<dyn CredentialHelper>,
    service: String,
}

impl Keychain {
    /// Choose a helper: the recorded `preferred` id if still registered, else
    /// the list's default if registered, else `BackendSelection`.
    pub fn select(
        preferred: Option<&str>,
        list: &KeychainList,
        service: &str,
    ) -> Result<Self, LockboxError> {
        if let Some(id) = preferred {
            if let Some(helper) = list.helper(id) {
                debug!(helper = id, "using recorded keychain helper");
                return Ok(Self::new(helper, service));
            }
            debug!(helper = id, "recorded keychain helper is not registered");
        }

        let default = list.default_helper().ok_or_else(|| {
            LockboxError::BackendSelection("no default keychain helper is configured".to_string())
        })?;
        let helper = list.helper(default).ok_or_else(|| {
            LockboxError::BackendSelection(format!(
                "default keychain helper `{default}` is not available"
            ))
        })?;
        debug!(helper = default, "using default keychain helper");
        Ok(Self::new(helper, service))
    }

    pub fn new(helper: Arc<dyn CredentialHelper>, service: impl Into<String>) -> Self {
        Self {
            helper,
            service: service.into(),
        }
    }

    /// Id of the underlying helper.
    pub fn helper_name(&self) -> &str {
        self.helper.name()
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Whether an entry exists under `account`. Absence is `Ok(false)`.
    pub fn has_secret(&self, account: &str) -> Result<bool, LockboxError> {
        self.helper.has(&self.service, account)
    }

    /// Load and decode the key stored under `account`.
    pub fn get_secret(&self, account: &str) -> Result<VaultKey, LockboxError> {
        let encoded = self.helper.get(&self.service, account)?;
        decode_key(&encoded)
    }

    /// Store `key` under `account`, overwriting any existing entry.
    pub fn set_secret(&self, account: &str, key: &VaultKey) -> Result<(), LockboxError> {
        let encoded = SecretString::from(STANDARD.encode(key.expose()));
        self.helper.set(&self.service, account, &encoded)
    }

    /// Generate `len` random bytes, store them under `account` and return them.
    pub fn create_secret(&self, account: &str, len: usize) -> Result<VaultKey, LockboxError> {
        let key = random_key(len)?;
        self.set_secret(account, &key)?;
        debug!(helper = self.helper_name(), account, len, "created vault key");
        Ok(key)
    }
}

impl std::fmt::Debug for Keychain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keychain")
            .field("helper", &self.helper.name())
            .field("service", &self.service)
            .finish()
    }
}

/// Fill a fresh key from the system CSPRNG.
pub fn random_key(len: usize) -> Result<VaultKey, LockboxError> {
    let rng = SystemRandom::new();
    generate_key(len, |buf| rng.fill(buf))
}

/// Build a key of `len` bytes from `fill`. A fill failure is a
/// fallback-eligible [`LockboxError::CredentialBackend`].
fn generate_key<F>(len: usize, fill: F) -> Result<VaultKey, LockboxError>
where
    F: FnOnce(&mut [u8]) -> Result<(), ring::error::Unspecified>,
{
    let mut bytes = Zeroizing::new(vec![0u8; len]);
    fill(bytes.as_mut_slice()).map_err(|_| LockboxError::CredentialBackend {
        message: "system random number generator failed while creating the vault key"
            .to_string(),
        source: None,
    })?;
    Ok(VaultKey::new(std::mem::take(&mut *bytes)))
}

fn decode_key(encoded: &SecretString) -> Result<VaultKey, LockboxError> {
    let bytes = STANDARD
        .decode(encoded.expose_secret().trim())
        .map_err(|e| LockboxError::InvalidKey(format!("keychain entry is not base64: {e}")))?;
    if bytes.is_empty() {
        return Err(LockboxError::InvalidKey("keychain entry is empty".to_string()));
    }
    Ok(VaultKey::new(bytes))
}
