// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the vault bootstrap.

pub mod credential;
pub mod paths;
pub mod store;

pub use credential::CredentialHelper;
pub use paths::PathProvider;
pub use store::{StoreOpener, VaultStore};
