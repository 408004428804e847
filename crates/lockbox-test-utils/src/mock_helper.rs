// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory credential helper with failure injection.
//!
//! `MockHelper` implements `CredentialHelper` over a shared map. Clones share
//! state, so a test can hand one clone to a `KeychainList` and keep another to
//! inspect entries and call counts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use secrecy::{ExposeSecret, SecretString};

use lockbox_core::{CredentialHelper, LockboxError};

/// How an injected failure presents itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The platform service cannot be reached.
    Unreachable,
    /// The platform refuses access.
    Denied,
}

impl Failure {
    fn to_error(self, account: &str) -> LockboxError {
        match self {
            Failure::Unreachable => LockboxError::CredentialBackend {
                message: "mock credential service unreachable".to_string(),
                source: None,
            },
            Failure::Denied => LockboxError::CredentialAccessDenied {
                account: account.to_string(),
                source: "mock access denied".into(),
            },
        }
    }
}

/// Number of calls made to each helper operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub has: usize,
    pub get: usize,
    pub set: usize,
}

#[derive(Default)]
struct MockState {
    entries: HashMap<(String, String), String>,
    fail_has: Option<Failure>,
    fail_get: Option<Failure>,
    fail_set: Option<Failure>,
    calls: CallCounts,
}

/// A credential helper backed by an in-memory map.
#[derive(Clone)]
pub struct MockHelper {
    name: String,
    state: Arc<Mutex<MockState>>,
}

impl MockHelper {
    /// Create an empty, healthy helper with the given id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Pre-load an entry.
    pub fn with_entry(self, service: &str, account: &str, value: &str) -> Self {
        self.state()
            .entries
            .insert((service.to_string(), account.to_string()), value.to_string());
        self
    }

    /// Make every `has` call fail.
    pub fn failing_has(self, failure: Failure) -> Self {
        self.state().fail_has = Some(failure);
        self
    }

    /// Make every `get` call fail.
    pub fn failing_get(self, failure: Failure) -> Self {
        self.state().fail_get = Some(failure);
        self
    }

    /// Make every `set` call fail.
    pub fn failing_set(self, failure: Failure) -> Self {
        self.state().fail_set = Some(failure);
        self
    }

    /// Make every operation fail as if the service were down.
    pub fn unreachable(self) -> Self {
        self.failing_has(Failure::Unreachable)
            .failing_get(Failure::Unreachable)
            .failing_set(Failure::Unreachable)
    }

    /// Clear injected failures (simulates the service coming back).
    pub fn heal(&self) {
        let mut state = self.state();
        state.fail_has = None;
        state.fail_get = None;
        state.fail_set = None;
    }

    /// Current raw value of an entry.
    pub fn entry(&self, service: &str, account: &str) -> Option<String> {
        self.state()
            .entries
            .get(&(service.to_string(), account.to_string()))
            .cloned()
    }

    /// Number of stored entries.
    pub fn entry_count(&self) -> usize {
        self.state().entries.len()
    }

    /// Snapshot of call counts.
    pub fn calls(&self) -> CallCounts {
        self.state().calls
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CredentialHelper for MockHelper {
    fn name(&self) -> &str {
        &self.name
    }

    fn has(&self, service: &str, account: &str) -> Result<bool, LockboxError> {
        let mut state = self.state();
        state.calls.has += 1;
        if let Some(failure) = state.fail_has {
            return Err(failure.to_error(account));
        }
        Ok(state
            .entries
            .contains_key(&(service.to_string(), account.to_string())))
    }

    fn get(&self, service: &str, account: &str) -> Result<SecretString, LockboxError> {
        let mut state = self.state();
        state.calls.get += 1;
        if let Some(failure) = state.fail_get {
            return Err(failure.to_error(account));
        }
        state
            .entries
            .get(&(service.to_string(), account.to_string()))
            .map(|value| SecretString::from(value.clone()))
            .ok_or_else(|| LockboxError::CredentialUnavailable {
                account: account.to_string(),
            })
    }

    fn set(&self, service: &str, account: &str, secret: &SecretString) -> Result<(), LockboxError> {
        let mut state = self.state();
        state.calls.set += 1;
        if let Some(failure) = state.fail_set {
            return Err(failure.to_error(account));
        }
        state.entries.insert(
            (service.to_string(), account.to_string()),
            secret.expose_secret().to_string(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries_and_counts() {
        let helper = MockHelper::new("mock");
        let observer = helper.clone();

        helper
            .set("svc", "acct", &SecretString::from("value".to_string()))
            .unwrap();
        assert!(helper.has("svc", "acct").unwrap());

        assert_eq!(observer.entry("svc", "acct").as_deref(), Some("value"));
        assert_eq!(observer.calls(), CallCounts { has: 1, get: 0, set: 1 });
    }

    #[test]
    fn missing_entry_is_not_an_error_for_has() {
        let helper = MockHelper::new("mock");
        assert!(!helper.has("svc", "acct").unwrap());
        assert!(matches!(
            helper.get("svc", "acct"),
            Err(LockboxError::CredentialUnavailable { .. })
        ));
    }

    #[test]
    fn injected_failures_heal() {
        let helper = MockHelper::new("mock").unreachable();
        assert!(helper.has("svc", "acct").is_err());
        helper.heal();
        assert!(!helper.has("svc", "acct").unwrap());
    }
}
