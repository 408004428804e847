// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Lockbox vault subsystem.

use std::path::PathBuf;

use strum::Display;
use thiserror::Error;

/// Boxed source error carried by collaborator failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across all Lockbox collaborators and the bootstrap.
#[derive(Debug, Error)]
pub enum LockboxError {
    /// Configuration errors (invalid TOML, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// An application directory could not be resolved or created.
    #[error("could not resolve {what} path: {source}")]
    PathResolution {
        what: &'static str,
        source: BoxError,
    },

    /// No usable credential helper could be selected.
    #[error("could not select keychain helper: {0}")]
    BackendSelection(String),

    /// The credential store has no entry under the account.
    #[error("no keychain entry for account `{account}`")]
    CredentialUnavailable { account: String },

    /// The entry exists but the credential store refused access to it.
    #[error("access to keychain entry `{account}` denied: {source}")]
    CredentialAccessDenied { account: String, source: BoxError },

    /// Lower-level credential store failure (service unreachable, platform error).
    #[error("keychain backend error: {message}")]
    CredentialBackend {
        message: String,
        source: Option<BoxError>,
    },

    /// The stored entry could be read but does not hold a usable key.
    #[error("invalid vault key in keychain: {0}")]
    InvalidKey(String),

    /// A key is known to exist in the credential store but could not be loaded.
    #[error("vault key `{account}` exists but could not be loaded: {source}")]
    KeyUnreadable {
        account: String,
        source: Box<LockboxError>,
    },

    /// The store collaborator could not open or initialize the vault.
    #[error("could not open vault at {}: {source}", dir.display())]
    StoreOpen { dir: PathBuf, source: BoxError },

    /// Runtime vault errors (encryption, serialization, persistence).
    #[error("vault error: {0}")]
    Vault(String),

    /// Wraps any error that aborted a vault bootstrap.
    #[error("could not create vault: {source}")]
    Bootstrap { source: Box<LockboxError> },
}

/// Coarse classification of a [`LockboxError`] for structured reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    ConfigError,
    PathResolutionError,
    CredentialBackendSelectionError,
    CredentialUnavailable,
    CredentialAccessDenied,
    CredentialBackendError,
    InvalidKey,
    KeyUnreadable,
    StoreOpenError,
    VaultError,
}

impl LockboxError {
    /// Returns the kind of this error. [`LockboxError::Bootstrap`] reports the
    /// kind of the error it wraps.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::ConfigError,
            Self::PathResolution { .. } => ErrorKind::PathResolutionError,
            Self::BackendSelection(_) => ErrorKind::CredentialBackendSelectionError,
            Self::CredentialUnavailable { .. } => ErrorKind::CredentialUnavailable,
            Self::CredentialAccessDenied { .. } => ErrorKind::CredentialAccessDenied,
            Self::CredentialBackend { .. } => ErrorKind::CredentialBackendError,
            Self::InvalidKey(_) => ErrorKind::InvalidKey,
            Self::KeyUnreadable { .. } => ErrorKind::KeyUnreadable,
            Self::StoreOpen { .. } => ErrorKind::StoreOpenError,
            Self::Vault(_) => ErrorKind::VaultError,
            Self::Bootstrap { source } => source.kind(),
        }
    }

    /// Whether a key provisioning failure of this kind lets the bootstrap
    /// continue in insecure mode.
    ///
    /// Failures that happen before a key is known to exist qualify. A key that
    /// exists but cannot be loaded never does: continuing would hide the
    /// previously encrypted data behind a fresh insecure vault.
    pub fn allows_insecure_fallback(&self) -> bool {
        matches!(
            self,
            Self::BackendSelection(_)
                | Self::CredentialUnavailable { .. }
                | Self::CredentialAccessDenied { .. }
                | Self::CredentialBackend { .. }
        )
    }

    /// Shorthand for a [`LockboxError::CredentialBackend`] with a source.
    pub fn backend(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::CredentialBackend {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Result alias used across the workspace.
pub type Result<T, E = LockboxError> = std::result::Result<T, E>;
