// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store collaborator traits: opening a vault and tearing it down.

use std::path::Path;

use crate::error::LockboxError;
use crate::types::VaultKey;

/// An opened vault handle with an explicit teardown step.
pub trait VaultStore: Send {
    /// Flushes pending writes and releases the store.
    ///
    /// Must be safe to call more than once; calls after the first are no-ops.
    fn close(&mut self) -> Result<(), LockboxError>;
}

/// Opens or initializes an encrypted store.
pub trait StoreOpener: Send + Sync {
    /// The handle type produced by a successful open.
    type Handle: VaultStore;

    /// Opens the store rooted at `dir`, creating it when missing.
    ///
    /// With `key = None` the store runs unencrypted. Returns the handle and a
    /// `corrupt` flag that is `true` when existing contents failed integrity
    /// checks and the store was opened in a degraded state.
    fn open(
        &self,
        dir: &Path,
        cache_dir: &Path,
        key: Option<&VaultKey>,
    ) -> Result<(Self::Handle, bool), LockboxError>;
}
