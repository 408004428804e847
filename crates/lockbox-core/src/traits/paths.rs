// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application directory resolution.

use std::path::PathBuf;

use crate::error::LockboxError;

/// Resolves the directories a vault bootstrap needs.
///
/// Implementations create the directories when missing and fail with
/// [`LockboxError::PathResolution`] when they cannot.
pub trait PathProvider: Send + Sync {
    /// Directory holding the secure vault and the helper preference.
    fn settings_path(&self) -> Result<PathBuf, LockboxError>;

    /// Auxiliary cache directory recorded by the store.
    fn cache_path(&self) -> Result<PathBuf, LockboxError>;
}
