// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OS credential helpers built on the `keyring` crate.
//!
//! Each helper pins one platform store explicitly instead of relying on
//! `keyring`'s process-wide default, so that the helper id recorded in the
//! preference file always names the store that holds the key.

use keyring::Entry;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use lockbox_core::{CredentialHelper, LockboxError};

/// A platform credential store reachable through `keyring`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsStore {
    /// macOS login keychain.
    #[cfg(target_os = "macos")]
    MacosKeychain,
    /// Windows Credential Manager.
    #[cfg(target_os = "windows")]
    WinCred,
    /// Secret Service for storage with the kernel keyring as a read cache.
    #[cfg(target_os = "linux")]
    KeyutilsPersistent,
    /// freedesktop Secret Service over D-Bus (GNOME Keyring, KWallet).
    #[cfg(target_os = "linux")]
    SecretService,
    /// Linux kernel keyutils session keyring. Lost on reboot.
    #[cfg(target_os = "linux")]
    Keyutils,
}

impl OsStore {
    /// Persistent stores compiled into this build, in platform preference
    /// order. These are registered by default.
    pub fn available() -> Vec<OsStore> {
        vec![
            #[cfg(target_os = "macos")]
            OsStore::MacosKeychain,
            #[cfg(target_os = "windows")]
            OsStore::WinCred,
            #[cfg(target_os = "linux")]
            OsStore::KeyutilsPersistent,
            #[cfg(target_os = "linux")]
            OsStore::SecretService,
        ]
    }

    /// Stores that are only registered when configuration names them.
    pub fn opt_in() -> Vec<OsStore> {
        vec![
            #[cfg(target_os = "linux")]
            OsStore::Keyutils,
        ]
    }

    /// Look up any compiled store by helper id.
    pub fn from_id(id: &str) -> Option<OsStore> {
        Self::available()
            .into_iter()
            .chain(Self::opt_in())
            .find(|store| store.id() == id)
    }

    /// Stable helper id.
    pub fn id(self) -> &'static str {
        match self {
            #[cfg(target_os = "macos")]
            OsStore::MacosKeychain => "macos-keychain",
            #[cfg(target_os = "windows")]
            OsStore::WinCred => "wincred",
            #[cfg(target_os = "linux")]
            OsStore::KeyutilsPersistent => "keyutils-persistent",
            #[cfg(target_os = "linux")]
            OsStore::SecretService => "secret-service",
            #[cfg(target_os = "linux")]
            OsStore::Keyutils => "keyutils",
        }
    }

    /// Whether entries survive a reboot.
    pub fn is_persistent(self) -> bool {
        match self {
            #[cfg(target_os = "linux")]
            OsStore::Keyutils => false,
            _ => true,
        }
    }

    fn entry(self, service: &str, account: &str) -> keyring::Result<Entry> {
        let credential: Box<keyring::Credential> = match self {
            #[cfg(target_os = "macos")]
            OsStore::MacosKeychain => Box::new(keyring::macos::MacCredential::new_with_target(
                None, service, account,
            )?),
            #[cfg(target_os = "windows")]
            OsStore::WinCred => Box::new(keyring::windows::WinCredential::new_with_target(
                None, service, account,
            )?),
            #[cfg(target_os = "linux")]
            OsStore::KeyutilsPersistent => Box::new(
                keyring::keyutils_persistent::KeyutilsPersistentCredential::new_with_target(
                    None, service, account,
                )?,
            ),
            #[cfg(target_os = "linux")]
            OsStore::SecretService => Box::new(
                keyring::secret_service::SsCredential::new_with_target(None, service, account)?,
            ),
            #[cfg(target_os = "linux")]
            OsStore::Keyutils => Box::new(keyring::keyutils::KeyutilsCredential::new_with_target(
                None, service, account,
            )?),
        };
        Ok(Entry::new_with_credential(credential))
    }
}

/// [`CredentialHelper`] over one [`OsStore`].
#[derive(Debug, Clone)]
pub struct KeyringHelper {
    store: OsStore,
}

impl KeyringHelper {
    pub fn new(store: OsStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> OsStore {
        self.store
    }

    fn entry(&self, service: &str, account: &str) -> Result<Entry, LockboxError> {
        self.store
            .entry(service, account)
            .map_err(|e| map_keyring_error(e, account))
    }
}

impl CredentialHelper for KeyringHelper {
    fn name(&self) -> &str {
        self.store.id()
    }

    fn has(&self, service: &str, account: &str) -> Result<bool, LockboxError> {
        let entry = self.entry(service, account)?;
        match entry.get_password() {
            Ok(_) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            // Present but undecodable or duplicated: the entry exists.
            Err(keyring::Error::BadEncoding(_)) | Err(keyring::Error::Ambiguous(_)) => Ok(true),
            Err(e) => Err(map_keyring_error(e, account)),
        }
    }

    fn get(&self, service: &str, account: &str) -> Result<SecretString, LockboxError> {
        let entry = self.entry(service, account)?;
        let password = entry
            .get_password()
            .map_err(|e| map_keyring_error(e, account))?;
        debug!(helper = self.name(), account, "keychain entry read");
        Ok(SecretString::from(password))
    }

    fn set(&self, service: &str, account: &str, secret: &SecretString) -> Result<(), LockboxError> {
        let entry = self.entry(service, account)?;
        entry
            .set_password(secret.expose_secret())
            .map_err(|e| map_keyring_error(e, account))?;
        debug!(helper = self.name(), account, "keychain entry written");
        Ok(())
    }
}

/// Map a `keyring` failure onto the credential error taxonomy.
pub fn map_keyring_error(err: keyring::Error, account: &str) -> LockboxError {
    match err {
        keyring::Error::NoEntry => LockboxError::CredentialUnavailable {
            account: account.to_string(),
        },
        keyring::Error::NoStorageAccess(source) => LockboxError::CredentialAccessDenied {
            account: account.to_string(),
            source,
        },
        keyring::Error::BadEncoding(_) => {
            LockboxError::InvalidKey("keychain entry is not valid UTF-8".to_string())
        }
        keyring::Error::PlatformFailure(source) => {
            LockboxError::backend("platform credential store failure", source)
        }
        other => LockboxError::CredentialBackend {
            message: other.to_string(),
            source: None,
        },
    }
}
