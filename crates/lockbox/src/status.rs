// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lockbox status` command implementation.
//!
//! Bootstraps the vault and reports which mode it opened in, whether its
//! contents were corrupt and which keychain helper holds the key.

use std::io::IsTerminal;
use std::path::PathBuf;

use lockbox_bootstrap::VaultBootstrap;
use lockbox_core::{LockboxError, PathProvider, StoreOpener};
use lockbox_keychain::read_helper_preference;
use lockbox_vault::FileVault;
use serde::Serialize;

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub mode: String,
    pub insecure: bool,
    pub corrupt: bool,
    pub encrypted: bool,
    pub vault_path: PathBuf,
    pub secrets: usize,
    pub helper: Option<String>,
    pub available_helpers: Vec<String>,
}

/// Bootstrap the vault and collect its status.
pub fn collect_status<P, S>(bootstrap: &VaultBootstrap<P, S>) -> Result<StatusReport, LockboxError>
where
    P: PathProvider,
    S: StoreOpener<Handle = FileVault>,
{
    let (insecure, corrupt, encrypted, vault_path, secrets) =
        bootstrap.with_vault(|vault, insecure, corrupt| {
            Ok::<_, LockboxError>((
                insecure,
                corrupt,
                vault.is_encrypted(),
                vault.path().to_path_buf(),
                vault.list_secrets()?.len(),
            ))
        })?;

    let settings_dir = bootstrap.paths().settings_path()?;
    let helper = read_helper_preference(&settings_dir)?;

    Ok(StatusReport {
        mode: if insecure { "insecure" } else { "secure" }.to_string(),
        insecure,
        corrupt,
        encrypted,
        vault_path,
        secrets,
        helper,
        available_helpers: bootstrap
            .keychains()
            .helper_names()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}

/// Run the `lockbox status` command.
///
/// If `--json` is passed, outputs structured JSON for scripting.
/// If `--plain` is passed or stdout is not a TTY, disables colors.
pub fn run_status<P, S>(
    bootstrap: &VaultBootstrap<P, S>,
    json: bool,
    plain: bool,
) -> Result<(), LockboxError>
where
    P: PathProvider,
    S: StoreOpener<Handle = FileVault>,
{
    let report = collect_status(bootstrap)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_status(&report, use_color);
    }

    Ok(())
}

fn print_status(report: &StatusReport, use_color: bool) {
    println!();
    println!("  lockbox status");
    println!("  {}", "-".repeat(35));

    if use_color {
        use colored::Colorize;
        if report.insecure {
            println!("    Mode:     {} {}", "✗".red(), "insecure (not encrypted)".red());
        } else {
            println!("    Mode:     {} {}", "✓".green(), "secure".green());
        }
        if report.corrupt {
            println!("    Contents: {} {}", "!".yellow(), "corrupt, reset to empty".yellow());
        }
    } else {
        if report.insecure {
            println!("    Mode:     [WARN] insecure (not encrypted)");
        } else {
            println!("    Mode:     [OK] secure");
        }
        if report.corrupt {
            println!("    Contents: [WARN] corrupt, reset to empty");
        }
    }

    println!("    Vault:    {}", report.vault_path.display());
    println!("    Secrets:  {}", report.secrets);
    println!(
        "    Helper:   {}",
        report.helper.as_deref().unwrap_or("(none recorded)")
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockbox_bootstrap::{Locations, ProvisionSettings};
    use lockbox_keychain::KeychainList;
    use lockbox_test_utils::MockHelper;
    use lockbox_vault::FileVaultOpener;

    fn bootstrap(
        root: &std::path::Path,
        helper: MockHelper,
    ) -> VaultBootstrap<Locations, FileVaultOpener> {
        VaultBootstrap::new(
            Locations::fixed(root.join("settings"), root.join("cache")),
            FileVaultOpener,
            KeychainList::new().with_helper(helper),
            ProvisionSettings::default(),
        )
    }

    #[test]
    fn secure_status_records_helper() {
        let root = tempfile::tempdir().unwrap();
        let report = collect_status(&bootstrap(root.path(), MockHelper::new("mock"))).unwrap();
        assert_eq!(report.mode, "secure");
        assert!(report.encrypted);
        assert!(!report.corrupt);
        assert_eq!(report.helper.as_deref(), Some("mock"));
        assert_eq!(report.available_helpers, vec!["mock".to_string()]);
    }

    #[test]
    fn insecure_status_when_helper_down() {
        let root = tempfile::tempdir().unwrap();
        let report =
            collect_status(&bootstrap(root.path(), MockHelper::new("mock").unreachable())).unwrap();
        assert_eq!(report.mode, "insecure");
        assert!(!report.encrypted);
        assert!(report.vault_path.to_string_lossy().contains("insecure"));
        assert_eq!(report.helper, None);
    }

    #[test]
    fn status_report_serializes() {
        let report = StatusReport {
            mode: "secure".to_string(),
            insecure: false,
            corrupt: true,
            encrypted: true,
            vault_path: PathBuf::from("/v/vault.enc"),
            secrets: 2,
            helper: Some("keyutils-persistent".to_string()),
            available_helpers: vec!["keyutils-persistent".to_string()],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"corrupt\":true"));
        assert!(json.contains("\"helper\":\"keyutils-persistent\""));
    }
}
