// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry of credential helpers available to this process.

use std::sync::Arc;

use tracing::warn;

use lockbox_config::model::KeychainConfig;
use lockbox_core::CredentialHelper;

use crate::os::{KeyringHelper, OsStore};

/// Registered helpers in preference order plus the designated default.
#[derive(Clone, Default)]
pub struct KeychainList {
    helpers: Vec<Arc<dyn CredentialHelper>>,
    default: Option<String>,
}

impl KeychainList {
    /// An empty registry with no default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every persistent OS helper compiled into this build. The first becomes
    /// the default. Opt-in stores are added by [`KeychainList::apply_config`].
    pub fn platform() -> Self {
        OsStore::available()
            .into_iter()
            .fold(Self::new(), |list, store| {
                list.with_helper(KeyringHelper::new(store))
            })
    }

    /// Register a helper. The first helper registered becomes the default
    /// unless one is set explicitly. A helper with an id already present
    /// replaces the earlier registration in place.
    pub fn with_helper(mut self, helper: impl CredentialHelper) -> Self {
        let helper: Arc<dyn CredentialHelper> = Arc::new(helper);
        if self.default.is_none() {
            self.default = Some(helper.name().to_string());
        }
        match self.helpers.iter().position(|h| h.name() == helper.name()) {
            Some(idx) => self.helpers[idx] = helper,
            None => self.helpers.push(helper),
        }
        self
    }

    /// Designate the default helper id. The id need not be registered; an
    /// unregistered default simply fails selection.
    pub fn with_default(mut self, id: impl Into<String>) -> Self {
        self.default = Some(id.into());
        self
    }

    /// Drop the default designation.
    pub fn without_default(mut self) -> Self {
        self.default = None;
        self
    }

    /// Narrow and reorder helpers per `[keychain]` config.
    ///
    /// Opt-in OS stores named in `helpers` or `default_helper` are registered
    /// first. A non-empty `helpers` list keeps only the listed ids, in listed
    /// order. Listed ids not compiled into this build are skipped with a
    /// warning. The default becomes `default_helper`, else the first remaining
    /// helper.
    pub fn apply_config(self, config: &KeychainConfig) -> Self {
        let mut helpers = self.helpers;
        let mut default = self.default;

        for id in config.helpers.iter().chain(config.default_helper.iter()) {
            if helpers.iter().any(|h| h.name() == id) {
                continue;
            }
            if let Some(store) = OsStore::from_id(id) {
                if !store.is_persistent() {
                    warn!(helper = %id, "keychain helper does not persist across reboots; the vault resets when its key is lost");
                }
                helpers.push(Arc::new(KeyringHelper::new(store)));
            }
        }

        if !config.helpers.is_empty() {
            let mut ordered = Vec::with_capacity(config.helpers.len());
            for id in &config.helpers {
                match helpers.iter().position(|h| h.name() == id) {
                    Some(idx) => ordered.push(helpers.remove(idx)),
                    None => warn!(helper = %id, "configured keychain helper is not available on this platform"),
                }
            }
            helpers = ordered;
            default = helpers.first().map(|h| h.name().to_string());
        }

        if let Some(id) = &config.default_helper {
            default = Some(id.clone());
        }

        Self { helpers, default }
    }

    /// Look up a registered helper by id.
    pub fn helper(&self, id: &str) -> Option<Arc<dyn CredentialHelper>> {
        self.helpers.iter().find(|h| h.name() == id).cloned()
    }

    /// Ids of registered helpers in preference order.
    pub fn helper_names(&self) -> Vec<&str> {
        self.helpers.iter().map(|h| h.name()).collect()
    }

    pub fn default_helper(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }
}

impl std::fmt::Debug for KeychainList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeychainList")
            .field("helpers", &self.helper_names())
            .field("default", &self.default)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockbox_test_utils::MockHelper;

    fn three() -> KeychainList {
        KeychainList::new()
            .with_helper(MockHelper::new("a"))
            .with_helper(MockHelper::new("b"))
            .with_helper(MockHelper::new("c"))
    }

    #[test]
    fn first_registered_is_default() {
        let list = three();
        assert_eq!(list.default_helper(), Some("a"));
        assert_eq!(list.helper_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn reregistering_replaces_in_place() {
        let list = three().with_helper(MockHelper::new("b"));
        assert_eq!(list.helper_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn config_reorders_and_filters() {
        let config = KeychainConfig {
            helpers: vec!["c".into(), "missing".into(), "a".into()],
            ..KeychainConfig::default()
        };
        let list = three().apply_config(&config);
        assert_eq!(list.helper_names(), vec!["c", "a"]);
        assert_eq!(list.default_helper(), Some("c"));
    }

    #[test]
    fn config_default_overrides() {
        let config = KeychainConfig {
            default_helper: Some("b".into()),
            ..KeychainConfig::default()
        };
        let list = three().apply_config(&config);
        assert_eq!(list.helper_names(), vec!["a", "b", "c"]);
        assert_eq!(list.default_helper(), Some("b"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_platform_default_is_persistent() {
        let list = KeychainList::platform();
        assert_eq!(list.default_helper(), Some("keyutils-persistent"));
        assert_ne!(list.default_helper(), Some("keyutils"));
        assert!(!list.helper_names().contains(&"keyutils"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn volatile_keyutils_only_when_configured() {
        let config = KeychainConfig {
            default_helper: Some("keyutils".into()),
            ..KeychainConfig::default()
        };
        let list = KeychainList::platform().apply_config(&config);
        assert!(list.helper("keyutils").is_some());
        assert_eq!(list.default_helper(), Some("keyutils"));

        let listed = KeychainConfig {
            helpers: vec!["keyutils".into()],
            ..KeychainConfig::default()
        };
        let list = KeychainList::platform().apply_config(&listed);
        assert_eq!(list.helper_names(), vec!["keyutils"]);
    }

    #[test]
    fn platform_list_default_is_registered() {
        let list = KeychainList::platform();
        if let Some(default) = list.default_helper() {
            assert!(list.helper(default).is_some());
        } else {
            assert!(list.is_empty());
        }
    }
}
