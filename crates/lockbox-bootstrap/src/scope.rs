// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped access to a bootstrapped vault.

use std::ops::{Deref, DerefMut};

use lockbox_core::{LockboxError, PathProvider, StoreOpener, VaultStore};
use tracing::{error, warn};

use crate::bootstrap::{Bootstrapped, VaultBootstrap};

/// Owns a store handle and closes it exactly once: explicitly through
/// [`StoreGuard::close`], or on drop (including during unwinding).
pub struct StoreGuard<H: VaultStore> {
    handle: H,
    closed: bool,
}

impl<H: VaultStore> StoreGuard<H> {
    pub fn new(handle: H) -> Self {
        Self {
            handle,
            closed: false,
        }
    }

    /// Close the handle now and report the outcome. Later calls are no-ops.
    pub fn close(&mut self) -> Result<(), LockboxError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.handle.close()
    }
}

impl<H: VaultStore> Deref for StoreGuard<H> {
    type Target = H;

    fn deref(&self) -> &H {
        &self.handle
    }
}

impl<H: VaultStore> DerefMut for StoreGuard<H> {
    fn deref_mut(&mut self) -> &mut H {
        &mut self.handle
    }
}

impl<H: VaultStore> Drop for StoreGuard<H> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            error!(error = %e, "failed to close vault during teardown");
        }
    }
}

impl<P: PathProvider, S: StoreOpener> VaultBootstrap<P, S> {
    /// Bootstrap a vault, run `unit_of_work` against it, then close it.
    ///
    /// `unit_of_work` receives the handle and the `insecure` and `corrupt`
    /// flags. It is not called when the bootstrap fails; the failure is
    /// returned wrapped in [`LockboxError::Bootstrap`]. The handle is closed
    /// after `unit_of_work` returns, fails or panics. A close failure is
    /// returned only when `unit_of_work` itself succeeded.
    pub fn with_vault<T, E, F>(&self, unit_of_work: F) -> Result<T, E>
    where
        F: FnOnce(&mut S::Handle, bool, bool) -> Result<T, E>,
        E: From<LockboxError>,
    {
        let Bootstrapped {
            handle,
            insecure,
            corrupt,
        } = self.bootstrap().map_err(|e| {
            E::from(LockboxError::Bootstrap {
                source: Box::new(e),
            })
        })?;

        let mut guard = StoreGuard::new(handle);
        let outcome = unit_of_work(&mut *guard, insecure, corrupt);
        let closed = guard.close();

        match (outcome, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(E::from(e)),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                warn!(error = %close_err, "failed to close vault after unit of work failed");
                Err(e)
            }
        }
    }
}
