// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault bootstrap: resolve the directory, provision the key, open the store.
//!
//! A bootstrap runs straight through the stages in [`BootstrapStage`] with no
//! loops or retries. Key provisioning failures that happen before a key is
//! known to exist switch the bootstrap to insecure mode, which opens an
//! unencrypted store in the `insecure` subdirectory so that unencrypted data
//! never shares a directory with encrypted data. Everything else aborts.

use std::path::PathBuf;

use lockbox_config::LockboxConfig;
use lockbox_core::{LockboxError, PathProvider, StoreOpener, VaultKey, VaultMode};
use lockbox_keychain::KeychainList;
use strum::Display;
use tracing::{debug, info, warn};

use crate::locations::Locations;
use crate::provision::{ProvisionSettings, provision_key};

/// Subdirectory of the settings directory used when no key is available.
pub const INSECURE_DIR: &str = "insecure";

/// Stages a bootstrap passes through, traced at debug level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BootstrapStage {
    Start,
    DirResolved,
    #[strum(to_string = "KeyAttempted({mode})")]
    KeyAttempted { mode: VaultMode },
    DirFinal,
    CacheResolved,
    #[strum(to_string = "StoreOpened(corrupt={corrupt})")]
    StoreOpened { corrupt: bool },
    Done,
}

/// An opened store plus the two conditions the caller must act on.
#[derive(Debug)]
pub struct Bootstrapped<H> {
    pub handle: H,
    /// No key was available; the store is unencrypted.
    pub insecure: bool,
    /// Existing store contents failed integrity checks.
    pub corrupt: bool,
}

impl<H> Bootstrapped<H> {
    pub fn mode(&self) -> VaultMode {
        if self.insecure {
            VaultMode::Insecure
        } else {
            VaultMode::Secure
        }
    }
}

/// Drives one vault bootstrap from its collaborators.
pub struct VaultBootstrap<P, S> {
    paths: P,
    opener: S,
    keychains: KeychainList,
    settings: ProvisionSettings,
}

impl<S: StoreOpener> VaultBootstrap<Locations, S> {
    /// Wire up the platform collaborators from configuration.
    pub fn from_config(config: &LockboxConfig, opener: S) -> Self {
        Self::new(
            Locations::from_config(&config.paths),
            opener,
            KeychainList::platform().apply_config(&config.keychain),
            ProvisionSettings::from_config(config),
        )
    }
}

impl<P: PathProvider, S: StoreOpener> VaultBootstrap<P, S> {
    pub fn new(paths: P, opener: S, keychains: KeychainList, settings: ProvisionSettings) -> Self {
        Self {
            paths,
            opener,
            keychains,
            settings,
        }
    }

    pub fn paths(&self) -> &P {
        &self.paths
    }

    pub fn keychains(&self) -> &KeychainList {
        &self.keychains
    }

    pub fn settings(&self) -> &ProvisionSettings {
        &self.settings
    }

    /// Run the bootstrap and hand back the opened store.
    ///
    /// The returned handle must be closed by the caller; prefer
    /// [`VaultBootstrap::with_vault`], which guarantees it.
    pub fn bootstrap(&self) -> Result<Bootstrapped<S::Handle>, LockboxError> {
        stage(BootstrapStage::Start);

        let settings_dir = self.paths.settings_path()?;
        stage(BootstrapStage::DirResolved);

        let (vault_dir, key) = self.provision(settings_dir)?;
        let insecure = key.is_none();
        stage(BootstrapStage::DirFinal);

        let cache_dir = self.paths.cache_path()?;
        stage(BootstrapStage::CacheResolved);

        let (handle, corrupt) = self
            .opener
            .open(&vault_dir, &cache_dir, key.as_ref())
            .map_err(|e| match e {
                LockboxError::StoreOpen { .. } => e,
                other => LockboxError::StoreOpen {
                    dir: vault_dir.clone(),
                    source: Box::new(other),
                },
            })?;
        stage(BootstrapStage::StoreOpened { corrupt });

        if corrupt {
            warn!(vault_dir = %vault_dir.display(), insecure, "vault contents were corrupt");
        }
        info!(vault_dir = %vault_dir.display(), insecure, corrupt, "vault opened");
        stage(BootstrapStage::Done);

        Ok(Bootstrapped {
            handle,
            insecure,
            corrupt,
        })
    }

    /// Provision the key, or pick the insecure directory when that fails in a
    /// way that permits it.
    fn provision(&self, settings_dir: PathBuf) -> Result<(PathBuf, Option<VaultKey>), LockboxError> {
        match provision_key(&settings_dir, &self.keychains, &self.settings) {
            Ok(key) => {
                stage(BootstrapStage::KeyAttempted {
                    mode: VaultMode::Secure,
                });
                Ok((settings_dir, Some(key)))
            }
            Err(e) if e.allows_insecure_fallback() => {
                stage(BootstrapStage::KeyAttempted {
                    mode: VaultMode::Insecure,
                });
                let insecure_dir = settings_dir.join(INSECURE_DIR);
                warn!(
                    error = %e,
                    kind = %e.kind(),
                    vault_dir = %insecure_dir.display(),
                    "no vault key available; continuing with an unencrypted vault"
                );
                Ok((insecure_dir, None))
            }
            Err(e) => Err(e),
        }
    }
}

fn stage(stage: BootstrapStage) {
    debug!(%stage, "vault bootstrap");
}
