// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted record of which credential helper holds the vault key.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use lockbox_core::LockboxError;

/// File name of the helper preference, inside the vault directory.
pub const PREFERENCE_FILE: &str = "keychain_state.json";

#[derive(Debug, Serialize, Deserialize)]
struct HelperPreference {
    helper: String,
}

pub fn preference_path(dir: &Path) -> PathBuf {
    dir.join(PREFERENCE_FILE)
}

/// Read the recorded helper id. A missing file is `Ok(None)`.
///
/// An unreadable or malformed file is a `BackendSelection` error: the helper
/// that holds the key cannot be determined.
pub fn read_helper_preference(dir: &Path) -> Result<Option<String>, LockboxError> {
    let path = preference_path(dir);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(LockboxError::BackendSelection(format!(
                "cannot read {}: {e}",
                path.display()
            )));
        }
    };
    let pref: HelperPreference = serde_json::from_slice(&bytes).map_err(|e| {
        LockboxError::BackendSelection(format!("malformed {}: {e}", path.display()))
    })?;
    if pref.helper.is_empty() {
        return Ok(None);
    }
    Ok(Some(pref.helper))
}

/// Record `helper` as the preferred helper, replacing the file atomically.
pub fn write_helper_preference(dir: &Path, helper: &str) -> Result<(), LockboxError> {
    let path = preference_path(dir);
    let tmp = dir.join(format!("{PREFERENCE_FILE}.tmp"));
    let body = serde_json::to_vec_pretty(&HelperPreference {
        helper: helper.to_string(),
    })
    .map_err(|e| LockboxError::Config(format!("cannot encode helper preference: {e}")))?;

    fs::create_dir_all(dir)
        .and_then(|()| fs::write(&tmp, &body))
        .and_then(|()| fs::rename(&tmp, &path))
        .map_err(|e| LockboxError::Config(format!("cannot write {}: {e}", path.display())))
}
