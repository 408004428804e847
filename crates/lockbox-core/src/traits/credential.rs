// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential helper trait implemented by every platform secret store.

use secrecy::SecretString;

use crate::error::LockboxError;

/// A platform credential store reachable under `(service, account)` pairs.
///
/// Helpers are thin: they report raw platform outcomes mapped onto
/// [`LockboxError`] and never retry. Encoding of key material is the
/// caller's concern.
pub trait CredentialHelper: Send + Sync + 'static {
    /// Returns the stable identifier of this helper (e.g. `secret-service`).
    fn name(&self) -> &str;

    /// Returns whether an entry exists.
    ///
    /// A missing entry is `Ok(false)`. Errors are reserved for genuine access
    /// failures such as an unreachable service or denied permission.
    fn has(&self, service: &str, account: &str) -> Result<bool, LockboxError>;

    /// Reads the entry.
    ///
    /// Fails with [`LockboxError::CredentialUnavailable`] when absent,
    /// [`LockboxError::CredentialAccessDenied`] when present but unreadable and
    /// [`LockboxError::CredentialBackend`] for anything else.
    fn get(&self, service: &str, account: &str) -> Result<SecretString, LockboxError>;

    /// Creates or overwrites the entry.
    fn set(&self, service: &str, account: &str, secret: &SecretString) -> Result<(), LockboxError>;
}
