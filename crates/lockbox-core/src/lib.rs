// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Lockbox vault subsystem.
//!
//! This crate provides the error type, key material type and the collaborator
//! traits (credential helpers, path resolution, store opening) used
//! throughout the Lockbox workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{BoxError, ErrorKind, LockboxError};
pub use types::{VaultKey, VaultMode};

pub use traits::{CredentialHelper, PathProvider, StoreOpener, VaultStore};
