// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lockbox keychain` subcommands.

use std::path::Path;

use clap::Subcommand;
use lockbox_core::LockboxError;
use lockbox_keychain::{KeychainList, read_helper_preference, write_helper_preference};
use lockbox_vault::VAULT_FILE;
use tracing::info;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum KeychainCommand {
    /// List the credential helpers available in this build.
    List,
    /// Record the credential helper that holds the vault key.
    Use {
        helper: String,
        /// Switch even though an encrypted vault exists under another helper.
        #[arg(long)]
        force: bool,
    },
}

/// Run a keychain subcommand and return the lines to print.
pub fn run_keychain(
    settings_dir: &Path,
    keychains: &KeychainList,
    command: &KeychainCommand,
) -> Result<Vec<String>, LockboxError> {
    let recorded = read_helper_preference(settings_dir)?;

    match command {
        KeychainCommand::List => Ok(keychains
            .helper_names()
            .into_iter()
            .map(|name| {
                let mut line = name.to_string();
                if keychains.default_helper() == Some(name) {
                    line.push_str(" (default)");
                }
                if recorded.as_deref() == Some(name) {
                    line.push_str(" (in use)");
                }
                line
            })
            .collect()),
        KeychainCommand::Use { helper, force } => {
            if keychains.helper(helper).is_none() {
                return Err(LockboxError::BackendSelection(format!(
                    "keychain helper `{helper}` is not available; available: {}",
                    keychains.helper_names().join(", ")
                )));
            }
            if recorded.as_deref() == Some(helper.as_str()) {
                return Ok(vec![format!("already using `{helper}`")]);
            }
            // The existing vault key lives in the previous helper.
            if !force && settings_dir.join(VAULT_FILE).exists() {
                return Err(LockboxError::BackendSelection(format!(
                    "an encrypted vault already exists; switching to `{helper}` would reset it (pass --force to switch anyway)"
                )));
            }
            write_helper_preference(settings_dir, helper)?;
            info!(helper = %helper, "recorded keychain helper");
            Ok(vec![format!("now using `{helper}`")])
        }
    }
}
