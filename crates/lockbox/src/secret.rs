// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lockbox secret` subcommands.

use std::io::{BufRead, IsTerminal};

use clap::Subcommand;
use lockbox_bootstrap::VaultBootstrap;
use lockbox_core::{LockboxError, PathProvider, StoreOpener};
use lockbox_vault::FileVault;
use secrecy::{ExposeSecret, SecretString};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SecretCommand {
    /// Print a secret's value.
    Get { name: String },
    /// Store a secret. Prompts for the value when it is omitted.
    Set { name: String, value: Option<String> },
    /// Remove a secret.
    Delete { name: String },
    /// List secret names with masked previews.
    List,
}

/// Run a secret subcommand inside a bootstrapped vault.
pub fn run_secret<P, S>(bootstrap: &VaultBootstrap<P, S>, command: SecretCommand) -> Result<(), LockboxError>
where
    P: PathProvider,
    S: StoreOpener<Handle = FileVault>,
{
    // Read the value before the vault is opened so a prompt never holds it open.
    let value = match &command {
        SecretCommand::Set { value: None, .. } => Some(read_value()?),
        SecretCommand::Set { value: Some(v), .. } => Some(SecretString::from(v.clone())),
        _ => None,
    };

    let lines = bootstrap.with_vault(|vault, insecure, corrupt| {
        if insecure {
            eprintln!("lockbox: warning: keychain unavailable, vault is NOT encrypted");
        }
        if corrupt {
            eprintln!("lockbox: warning: vault contents were corrupt and have been reset");
        }
        execute(vault, &command, value.as_ref())
    })?;

    for line in lines {
        println!("{line}");
    }
    Ok(())
}

/// Apply `command` to an open vault and return the lines to print.
pub fn execute(
    vault: &mut FileVault,
    command: &SecretCommand,
    value: Option<&SecretString>,
) -> Result<Vec<String>, LockboxError> {
    match command {
        SecretCommand::Get { name } => vault
            .get_secret(name)?
            .map(|v| vec![v.expose_secret().to_string()])
            .ok_or_else(|| LockboxError::Vault(format!("no secret named `{name}`"))),
        SecretCommand::Set { name, .. } => {
            let value = value
                .ok_or_else(|| LockboxError::Vault("no value supplied".to_string()))?;
            vault.set_secret(name, value.expose_secret())?;
            Ok(Vec::new())
        }
        SecretCommand::Delete { name } => {
            if vault.delete_secret(name)? {
                Ok(Vec::new())
            } else {
                Err(LockboxError::Vault(format!("no secret named `{name}`")))
            }
        }
        SecretCommand::List => Ok(vault
            .list_secrets()?
            .into_iter()
            .map(|(name, masked)| format!("{name}\t{masked}"))
            .collect()),
    }
}

/// Prompt on a terminal, otherwise read one line from stdin.
fn read_value() -> Result<SecretString, LockboxError> {
    let value = if std::io::stdin().is_terminal() {
        eprint!("Secret value: ");
        rpassword::read_password()
            .map_err(|e| LockboxError::Vault(format!("failed to read secret value: {e}")))?
    } else {
        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| LockboxError::Vault(format!("failed to read secret value: {e}")))?;
        line.trim_end_matches(['\r', '\n']).to_string()
    };
    if value.is_empty() {
        return Err(LockboxError::Vault("empty secret value not allowed".to_string()));
    }
    Ok(SecretString::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockbox_core::StoreOpener;
    use lockbox_vault::FileVaultOpener;

    fn vault(dir: &std::path::Path) -> FileVault {
        FileVaultOpener.open(dir, dir, None).unwrap().0
    }

    #[test]
    fn set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let mut vault = vault(dir.path());
        let value = SecretString::from("app-password-123".to_string());

        let set = SecretCommand::Set {
            name: "smtp".into(),
            value: None,
        };
        assert!(execute(&mut vault, &set, Some(&value)).unwrap().is_empty());

        let get = SecretCommand::Get { name: "smtp".into() };
        assert_eq!(execute(&mut vault, &get, None).unwrap(), vec!["app-password-123"]);
    }

    #[test]
    fn list_masks_values() {
        let dir = tempfile::tempdir().unwrap();
        let mut vault = vault(dir.path());
        vault.set_secret("imap", "abcd-long-secret-wxyz").unwrap();
        let lines = execute(&mut vault, &SecretCommand::List, None).unwrap();
        assert_eq!(lines, vec!["imap\tabcd...wxyz"]);
    }

    #[test]
    fn missing_secret_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut vault = vault(dir.path());
        let get = SecretCommand::Get { name: "nope".into() };
        assert!(execute(&mut vault, &get, None).is_err());
        let delete = SecretCommand::Delete { name: "nope".into() };
        assert!(execute(&mut vault, &delete, None).is_err());
    }
}
