// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Path provider rooted in a temporary directory.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;

use lockbox_core::{LockboxError, PathProvider};

/// A `PathProvider` whose settings and cache directories live under a
/// private temporary directory that is removed on drop.
pub struct MockPaths {
    root: TempDir,
    fail_settings: AtomicBool,
    fail_cache: AtomicBool,
    calls: Arc<AtomicUsize>,
}

impl MockPaths {
    pub fn new() -> std::io::Result<Self> {
        let root = tempfile::tempdir()?;
        std::fs::create_dir_all(root.path().join("settings"))?;
        std::fs::create_dir_all(root.path().join("cache"))?;
        Ok(Self {
            root,
            fail_settings: AtomicBool::new(false),
            fail_cache: AtomicBool::new(false),
            calls: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Make `settings_path` fail.
    pub fn failing_settings(self) -> Self {
        self.fail_settings.store(true, Ordering::SeqCst);
        self
    }

    /// Make `cache_path` fail.
    pub fn failing_cache(self) -> Self {
        self.fail_cache.store(true, Ordering::SeqCst);
        self
    }

    /// The settings directory, without counting a call.
    pub fn settings_dir(&self) -> PathBuf {
        self.root.path().join("settings")
    }

    /// The cache directory, without counting a call.
    pub fn cache_dir(&self) -> PathBuf {
        self.root.path().join("cache")
    }

    /// Total number of `settings_path` and `cache_path` calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PathProvider for MockPaths {
    fn settings_path(&self) -> Result<PathBuf, LockboxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_settings.load(Ordering::SeqCst) {
            return Err(LockboxError::PathResolution {
                what: "settings",
                source: "mock settings directory unavailable".into(),
            });
        }
        Ok(self.settings_dir())
    }

    fn cache_path(&self) -> Result<PathBuf, LockboxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_cache.load(Ordering::SeqCst) {
            return Err(LockboxError::PathResolution {
                what: "cache",
                source: "mock cache directory unavailable".into(),
            });
        }
        Ok(self.cache_dir())
    }
}
