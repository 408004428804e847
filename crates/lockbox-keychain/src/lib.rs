// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential store adapter for Lockbox.
//!
//! [`KeychainList`] registers the credential helpers usable by this process.
//! [`Keychain::select`] picks one (recorded preference, then default) and
//! exposes has/get/set/create for the vault key. The chosen helper is
//! remembered per installation in `keychain_state.json`.

pub mod keychain;
pub mod list;
pub mod os;
pub mod preference;

pub use keychain::{Keychain, random_key};
pub use list::KeychainList;
pub use os::{KeyringHelper, OsStore};
pub use preference::{PREFERENCE_FILE, read_helper_preference, write_helper_preference};
