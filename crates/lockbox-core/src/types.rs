// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the keychain adapter, the store and the bootstrap.

use strum::Display;
use zeroize::Zeroizing;

/// Opaque key material used to seal and open the vault.
///
/// The bytes are zeroed on drop and never printed: `Debug` output only
/// reports the length.
#[derive(Clone, PartialEq, Eq)]
pub struct VaultKey(Zeroizing<Vec<u8>>);

impl VaultKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Borrow the raw key bytes.
    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultKey")
            .field("len", &self.0.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

impl From<Vec<u8>> for VaultKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

/// Which of the two directory variants a vault lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum VaultMode {
    /// Key provisioned; store rooted at the settings directory.
    Secure,
    /// No key; store rooted at the `insecure` subdirectory.
    Insecure,
}

impl VaultMode {
    pub fn is_insecure(self) -> bool {
        self == VaultMode::Insecure
    }
}
