// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM encrypted single-file vault for Lockbox.
//!
//! [`FileVaultOpener`] is the store collaborator handed to the bootstrap. With
//! a key it seals the vault file; without one it writes a plaintext vault.
//! Contents that fail integrity checks are moved aside to `vault.enc.corrupt`
//! and reported through the `corrupt` flag rather than as an error.

pub mod crypto;
pub mod opener;
pub mod vault;

pub use opener::FileVaultOpener;
pub use vault::{CORRUPT_SUFFIX, FileVault, VAULT_FILE, VaultData, mask_secret};
