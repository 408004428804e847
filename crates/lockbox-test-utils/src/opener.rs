// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store opener doubles.
//!
//! `FakeOpener` records every open request and hands out `FakeStore` handles
//! whose closes are counted, so tests can assert which directory was opened,
//! whether a key was supplied and that teardown ran exactly once.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lockbox_core::{LockboxError, StoreOpener, VaultKey, VaultStore};

/// One recorded `open` call.
#[derive(Debug, Clone)]
pub struct OpenRequest {
    pub dir: PathBuf,
    pub cache_dir: PathBuf,
    pub key: Option<VaultKey>,
}

#[derive(Default)]
struct OpenerState {
    requests: Vec<OpenRequest>,
    report_corrupt: bool,
    fail_open: bool,
    fail_close: bool,
}

/// A store opener that never touches disk.
#[derive(Clone, Default)]
pub struct FakeOpener {
    state: Arc<Mutex<OpenerState>>,
    closes: Arc<AtomicUsize>,
}

impl FakeOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report every opened store as corrupt.
    pub fn corrupt(self) -> Self {
        self.state().report_corrupt = true;
        self
    }

    /// Fail every open with a `StoreOpen` error.
    pub fn failing(self) -> Self {
        self.state().fail_open = true;
        self
    }

    /// Make `close` on handed-out stores fail (after counting).
    pub fn failing_close(self) -> Self {
        self.state().fail_close = true;
        self
    }

    /// All open requests received so far.
    pub fn requests(&self) -> Vec<OpenRequest> {
        self.state().requests.clone()
    }

    pub fn open_count(&self) -> usize {
        self.state().requests.len()
    }

    /// Number of effective (first) closes across all handed-out stores.
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    fn state(&self) -> MutexGuard<'_, OpenerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StoreOpener for FakeOpener {
    type Handle = FakeStore;

    fn open(
        &self,
        dir: &Path,
        cache_dir: &Path,
        key: Option<&VaultKey>,
    ) -> Result<(FakeStore, bool), LockboxError> {
        let mut state = self.state();
        state.requests.push(OpenRequest {
            dir: dir.to_path_buf(),
            cache_dir: cache_dir.to_path_buf(),
            key: key.cloned(),
        });
        if state.fail_open {
            return Err(LockboxError::StoreOpen {
                dir: dir.to_path_buf(),
                source: "fake store refused to open".into(),
            });
        }
        let store = FakeStore {
            dir: dir.to_path_buf(),
            encrypted: key.is_some(),
            closed: false,
            fail_close: state.fail_close,
            closes: Arc::clone(&self.closes),
        };
        Ok((store, state.report_corrupt))
    }
}

/// Handle produced by [`FakeOpener`].
#[derive(Debug)]
pub struct FakeStore {
    dir: PathBuf,
    encrypted: bool,
    closed: bool,
    fail_close: bool,
    closes: Arc<AtomicUsize>,
}

impl FakeStore {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl VaultStore for FakeStore {
    fn close(&mut self) -> Result<(), LockboxError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(LockboxError::Vault("fake store failed to flush".into()));
        }
        Ok(())
    }
}

/// Wraps any opener and counts opens.
pub struct CountingOpener<O> {
    inner: O,
    opens: Arc<AtomicUsize>,
}

impl<O: StoreOpener> CountingOpener<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            opens: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter, readable after the opener has been moved.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.opens)
    }
}

impl<O: StoreOpener> StoreOpener for CountingOpener<O> {
    type Handle = O::Handle;

    fn open(
        &self,
        dir: &Path,
        cache_dir: &Path,
        key: Option<&VaultKey>,
    ) -> Result<(Self::Handle, bool), LockboxError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.inner.open(dir, cache_dir, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_is_counted_once() {
        let opener = FakeOpener::new();
        let (mut store, corrupt) = opener
            .open(Path::new("/v"), Path::new("/c"), None)
            .unwrap();
        assert!(!corrupt);
        store.close().unwrap();
        store.close().unwrap();
        assert_eq!(opener.close_count(), 1);
        assert!(store.is_closed());
    }

    #[test]
    fn records_key_presence() {
        let opener = FakeOpener::new().corrupt();
        let key = VaultKey::new(vec![7; 32]);
        let (store, corrupt) = opener
            .open(Path::new("/v"), Path::new("/c"), Some(&key))
            .unwrap();
        assert!(corrupt);
        assert!(store.is_encrypted());
        assert_eq!(opener.requests()[0].key.as_ref(), Some(&key));
    }

    #[test]
    fn counting_opener_forwards() {
        let counting = CountingOpener::new(FakeOpener::new().failing());
        let counter = counting.counter();
        assert!(counting
            .open(Path::new("/v"), Path::new("/c"), None)
            .is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
