// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-file vault: secrets held in memory, persisted on flush.
//!
//! On-disk layout:
//! - 8-byte magic: `LBXVLT01` (sealed) or `LBXPLN01` (plaintext).
//! - Sealed files: 12-byte nonce, then AES-256-GCM ciphertext with tag. The
//!   magic is bound as associated data.
//! - The body is the JSON encoding of [`VaultData`].

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use lockbox_core::{LockboxError, VaultStore};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::{self, NONCE_LEN};

/// Vault file name inside the vault directory.
pub const VAULT_FILE: &str = "vault.enc";
/// Suffix appended to a vault file that failed integrity checks.
pub const CORRUPT_SUFFIX: &str = ".corrupt";

pub(crate) const MAGIC_SEALED: &[u8; 8] = b"LBXVLT01";
pub(crate) const MAGIC_PLAIN: &[u8; 8] = b"LBXPLN01";
const FORMAT_VERSION: u32 = 1;

/// Decoded vault contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultData {
    pub version: u32,
    pub cache_dir: PathBuf,
    pub secrets: BTreeMap<String, String>,
}

impl VaultData {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            version: FORMAT_VERSION,
            cache_dir: cache_dir.to_path_buf(),
            secrets: BTreeMap::new(),
        }
    }
}

/// Serialize and (when a key is present) seal vault contents.
pub(crate) fn encode(data: &VaultData, key: Option<&[u8; 32]>) -> Result<Vec<u8>, LockboxError> {
    let body = Zeroizing::new(
        serde_json::to_vec(data)
            .map_err(|e| LockboxError::Vault(format!("cannot serialize vault: {e}")))?,
    );
    let mut out = Vec::with_capacity(8 + NONCE_LEN + body.len() + 16);
    match key {
        Some(key) => {
            let (ciphertext, nonce) = crypto::seal(key, MAGIC_SEALED, &body)?;
            out.extend_from_slice(MAGIC_SEALED);
            out.extend_from_slice(&nonce);
            out.extend_from_slice(&ciphertext);
        }
        None => {
            out.extend_from_slice(MAGIC_PLAIN);
            out.extend_from_slice(&body);
        }
    }
    Ok(out)
}

/// Parse file bytes. Any failure means the file is unusable with this key.
pub(crate) fn decode(bytes: &[u8], key: Option<&[u8; 32]>) -> Result<VaultData, String> {
    let (magic, rest) = bytes
        .split_at_checked(8)
        .ok_or_else(|| "file shorter than header".to_string())?;

    let body = match (magic, key) {
        (m, Some(key)) if m == MAGIC_SEALED => {
            let (nonce, ciphertext) = rest
                .split_at_checked(NONCE_LEN)
                .ok_or_else(|| "truncated nonce".to_string())?;
            let nonce: [u8; NONCE_LEN] = nonce
                .try_into()
                .map_err(|_| "truncated nonce".to_string())?;
            crypto::open(key, &nonce, MAGIC_SEALED, ciphertext).map_err(|e| e.to_string())?
        }
        (m, None) if m == MAGIC_PLAIN => Zeroizing::new(rest.to_vec()),
        (m, Some(_)) if m == MAGIC_PLAIN => return Err("plaintext vault opened with a key".into()),
        (m, None) if m == MAGIC_SEALED => return Err("sealed vault opened without a key".into()),
        _ => return Err("unrecognized header".into()),
    };

    let data: VaultData =
        serde_json::from_slice(&body).map_err(|e| format!("malformed vault body: {e}"))?;
    if data.version != FORMAT_VERSION {
        return Err(format!("unsupported vault version {}", data.version));
    }
    Ok(data)
}

/// Replace `path` with `bytes` via a temp file and rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

/// An opened vault.
///
/// Debug output omits both the key and the secret values.
pub struct FileVault {
    path: PathBuf,
    key: Option<Zeroizing<[u8; 32]>>,
    data: VaultData,
    dirty: bool,
    closed: bool,
}

impl std::fmt::Debug for FileVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileVault")
            .field("path", &self.path)
            .field("encrypted", &self.key.is_some())
            .field("secrets", &self.data.secrets.len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl FileVault {
    pub(crate) fn new(path: PathBuf, key: Option<Zeroizing<[u8; 32]>>, data: VaultData) -> Self {
        Self {
            path,
            key,
            data,
            dirty: false,
            closed: false,
        }
    }

    /// Retrieve a secret by name.
    pub fn get_secret(&self, name: &str) -> Result<Option<SecretString>, LockboxError> {
        self.ensure_open()?;
        Ok(self
            .data
            .secrets
            .get(name)
            .map(|v| SecretString::from(v.clone())))
    }

    /// Store a secret, overwriting any existing value. Persisted on flush.
    pub fn set_secret(&mut self, name: &str, value: &str) -> Result<(), LockboxError> {
        self.ensure_open()?;
        self.data.secrets.insert(name.to_string(), value.to_string());
        self.dirty = true;
        debug!(name = %name, "secret stored in vault");
        Ok(())
    }

    /// Delete a secret. Returns whether it existed.
    pub fn delete_secret(&mut self, name: &str) -> Result<bool, LockboxError> {
        self.ensure_open()?;
        let existed = self.data.secrets.remove(name).is_some();
        if existed {
            self.dirty = true;
            debug!(name = %name, "secret deleted from vault");
        }
        Ok(existed)
    }

    /// List all secrets with masked previews, sorted by name.
    pub fn list_secrets(&self) -> Result<Vec<(String, String)>, LockboxError> {
        self.ensure_open()?;
        Ok(self
            .data
            .secrets
            .iter()
            .map(|(name, value)| (name.clone(), mask_secret(value)))
            .collect())
    }

    /// Cache directory recorded in the vault.
    pub fn cache_dir(&self) -> &Path {
        &self.data.cache_dir
    }

    pub fn is_encrypted(&self) -> bool {
        self.key.is_some()
    }

    /// Path of the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_cache_dir(&mut self, cache_dir: &Path) {
        if self.data.cache_dir != cache_dir {
            self.data.cache_dir = cache_dir.to_path_buf();
            self.dirty = true;
        }
    }

    /// Write pending changes to disk.
    pub fn flush(&mut self) -> Result<(), LockboxError> {
        self.ensure_open()?;
        if !self.dirty {
            return Ok(());
        }
        let bytes = encode(&self.data, self.key.as_deref())?;
        write_atomic(&self.path, &bytes).map_err(|e| {
            LockboxError::Vault(format!("cannot write {}: {e}", self.path.display()))
        })?;
        self.dirty = false;
        debug!(path = %self.path.display(), "vault flushed");
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), LockboxError> {
        if self.closed {
            return Err(LockboxError::Vault("vault is closed".to_string()));
        }
        Ok(())
    }
}

impl VaultStore for FileVault {
    fn close(&mut self) -> Result<(), LockboxError> {
        if self.closed {
            return Ok(());
        }
        let result = self.flush();
        self.closed = true;
        self.data.secrets.clear();
        result
    }
}

/// Mask a secret value for display: "sk-ant-api03-abc...xyz" format.
///
/// Shows prefix (up to 4 chars) and suffix (up to 4 chars) with "..." in between.
/// Short values (< 10 chars) are fully masked as "****".
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}
