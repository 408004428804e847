// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opens or initializes a [`FileVault`] in a directory.

use std::fs;
use std::path::{Path, PathBuf};

use lockbox_core::{LockboxError, StoreOpener, VaultKey};
use tracing::{info, warn};

use crate::crypto;
use crate::vault::{CORRUPT_SUFFIX, FileVault, VAULT_FILE, VaultData, decode};

/// Store collaborator backed by one `vault.enc` file per directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileVaultOpener;

impl FileVaultOpener {
    pub fn new() -> Self {
        Self
    }
}

impl StoreOpener for FileVaultOpener {
    type Handle = FileVault;

    fn open(
        &self,
        dir: &Path,
        cache_dir: &Path,
        key: Option<&VaultKey>,
    ) -> Result<(FileVault, bool), LockboxError> {
        create_private_dir(dir).map_err(|e| store_open(dir, e))?;

        let path = dir.join(VAULT_FILE);
        let aead_key = key.map(crypto::derive_key);

        let existing = match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(store_open(dir, e)),
        };

        let (data, corrupt) = match existing {
            None => (None, false),
            Some(bytes) => match decode(&bytes, aead_key.as_deref()) {
                Ok(data) => (Some(data), false),
                Err(reason) => {
                    let quarantined = quarantine(&path).map_err(|e| store_open(dir, e))?;
                    warn!(
                        vault = %path.display(),
                        moved_to = %quarantined.display(),
                        reason = %reason,
                        "vault contents failed integrity checks; starting a fresh vault"
                    );
                    (None, true)
                }
            },
        };

        let mut vault = match data {
            Some(data) => {
                let mut vault = FileVault::new(path, aead_key, data);
                vault.set_cache_dir(cache_dir);
                vault
            }
            None => {
                let mut vault = FileVault::new(path, aead_key, VaultData::new(cache_dir));
                vault.mark_dirty();
                info!(vault = %vault.path().display(), encrypted = vault.is_encrypted(), "vault initialized");
                vault
            }
        };
        vault.flush().map_err(|e| store_open(dir, e))?;

        Ok((vault, corrupt))
    }
}

fn store_open(dir: &Path, source: impl Into<lockbox_core::BoxError>) -> LockboxError {
    LockboxError::StoreOpen {
        dir: dir.to_path_buf(),
        source: source.into(),
    }
}

/// Move an unreadable vault file aside, replacing any earlier quarantine.
fn quarantine(path: &Path) -> std::io::Result<PathBuf> {
    let mut target = path.as_os_str().to_owned();
    target.push(CORRUPT_SUFFIX);
    let target = PathBuf::from(target);
    fs::rename(path, &target)?;
    Ok(target)
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}
