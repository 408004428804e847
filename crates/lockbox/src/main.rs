// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lockbox - a local secret vault keyed from the platform credential store.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod keychain;
mod secret;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lockbox_bootstrap::VaultBootstrap;
use lockbox_config::LockboxConfig;
use lockbox_core::{LockboxError, PathProvider};
use lockbox_vault::FileVaultOpener;
use tracing_subscriber::EnvFilter;

use crate::keychain::KeychainCommand;
use crate::secret::SecretCommand;

/// Lockbox - a local secret vault keyed from the platform credential store.
#[derive(Parser, Debug)]
#[command(name = "lockbox", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show vault mode, integrity and the keychain helper in use.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Read and write secrets in the vault.
    Secret {
        #[command(subcommand)]
        action: SecretCommand,
    },
    /// Inspect and choose the credential helper.
    Keychain {
        #[command(subcommand)]
        action: KeychainCommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => lockbox_config::load_and_validate_path(path),
        None => lockbox_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            lockbox_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    let Some(command) = cli.command else {
        println!("lockbox: use --help for available commands");
        return;
    };

    if let Err(e) = run(&config, command) {
        eprintln!("lockbox: {e}");
        std::process::exit(1);
    }
}

fn run(config: &LockboxConfig, command: Commands) -> Result<(), LockboxError> {
    let bootstrap = VaultBootstrap::from_config(config, FileVaultOpener);

    match command {
        Commands::Status { json, plain } => status::run_status(&bootstrap, json, plain),
        Commands::Secret { action } => secret::run_secret(&bootstrap, action),
        Commands::Keychain { action } => {
            let settings_dir = bootstrap.paths().settings_path()?;
            for line in keychain::run_keychain(&settings_dir, bootstrap.keychains(), &action)? {
                println!("{line}");
            }
            Ok(())
        }
    }
}

/// Initialize the tracing subscriber on stderr.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "lockbox={log_level},lockbox_bootstrap={log_level},lockbox_keychain={log_level},lockbox_vault={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
