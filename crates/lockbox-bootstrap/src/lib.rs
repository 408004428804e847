// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault bootstrap for Lockbox.
//!
//! Decides at process start how the local vault obtains its key:
//! - [`provision_key`] loads the key from the selected credential helper,
//!   creating it on first run.
//! - [`VaultBootstrap::bootstrap`] resolves directories, provisions the key
//!   (falling back to an unencrypted vault under `insecure/` when the
//!   credential store cannot supply one) and opens the store.
//! - [`VaultBootstrap::with_vault`] runs a unit of work against the opened
//!   store and always closes it afterwards.
//!
//! # Usage
//!
//! ```no_run
//! use lockbox_bootstrap::VaultBootstrap;
//! use lockbox_core::LockboxError;
//! use lockbox_vault::FileVaultOpener;
//!
//! let config = lockbox_config::LockboxConfig::default();
//! let bootstrap = VaultBootstrap::from_config(&config, FileVaultOpener);
//! bootstrap.with_vault(|vault, insecure, corrupt| {
//!     if corrupt {
//!         eprintln!("vault was corrupt and has been reset");
//!     }
//!     vault.set_secret("smtp.password", "hunter2")?;
//!     Ok::<_, LockboxError>(insecure)
//! })?;
//! # Ok::<(), LockboxError>(())
//! ```

pub mod bootstrap;
pub mod locations;
pub mod provision;
pub mod scope;

pub use bootstrap::{BootstrapStage, Bootstrapped, INSECURE_DIR, VaultBootstrap};
pub use locations::Locations;
pub use provision::{ProvisionSettings, provision_key};
pub use scope::StoreGuard;
