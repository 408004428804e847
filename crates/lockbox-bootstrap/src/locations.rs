// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default application directories.

use std::fs;
use std::path::{Path, PathBuf};

use lockbox_config::model::PathsConfig;
use lockbox_core::{LockboxError, PathProvider};

/// Subdirectory name used under the platform config and cache dirs.
const APP_DIR: &str = "lockbox";

/// Resolves settings and cache directories from `[paths]` overrides or the
/// platform defaults (`dirs::config_dir()` / `dirs::cache_dir()`), creating
/// them on demand.
#[derive(Debug, Clone, Default)]
pub struct Locations {
    settings_dir: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
}

impl Locations {
    pub fn from_config(paths: &PathsConfig) -> Self {
        Self {
            settings_dir: paths.settings_dir.as_deref().map(PathBuf::from),
            cache_dir: paths.cache_dir.as_deref().map(PathBuf::from),
        }
    }

    /// Pin both directories, bypassing platform lookup.
    pub fn fixed(settings_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            settings_dir: Some(settings_dir.into()),
            cache_dir: Some(cache_dir.into()),
        }
    }

    fn resolve(
        what: &'static str,
        configured: Option<&Path>,
        platform: Option<PathBuf>,
    ) -> Result<PathBuf, LockboxError> {
        let dir = match configured {
            Some(dir) => dir.to_path_buf(),
            None => platform
                .map(|base| base.join(APP_DIR))
                .ok_or_else(|| LockboxError::PathResolution {
                    what,
                    source: "no platform directory is defined for this user".into(),
                })?,
        };
        create_private_dir(&dir).map_err(|e| LockboxError::PathResolution {
            what,
            source: Box::new(e),
        })?;
        Ok(dir)
    }
}

impl PathProvider for Locations {
    fn settings_path(&self) -> Result<PathBuf, LockboxError> {
        Self::resolve("settings", self.settings_dir.as_deref(), dirs::config_dir())
    }

    fn cache_path(&self) -> Result<PathBuf, LockboxError> {
        Self::resolve("cache", self.cache_dir.as_deref(), dirs::cache_dir())
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockbox_core::ErrorKind;

    #[test]
    fn configured_dirs_are_created() {
        let root = tempfile::tempdir().unwrap();
        let locations = Locations::fixed(root.path().join("s"), root.path().join("c"));
        assert_eq!(locations.settings_path().unwrap(), root.path().join("s"));
        assert_eq!(locations.cache_path().unwrap(), root.path().join("c"));
        assert!(root.path().join("s").is_dir());
        assert!(root.path().join("c").is_dir());
    }

    #[test]
    fn from_config_uses_overrides() {
        let root = tempfile::tempdir().unwrap();
        let settings = root.path().join("settings");
        let paths = PathsConfig {
            settings_dir: Some(settings.display().to_string()),
            cache_dir: None,
        };
        assert_eq!(Locations::from_config(&paths).settings_path().unwrap(), settings);
    }

    #[test]
    fn uncreatable_dir_is_path_resolution_error() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let locations = Locations::fixed(blocker.join("s"), root.path());
        let err = locations.settings_path().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PathResolutionError);
        assert!(err.to_string().contains("settings"));
    }

    #[test]
    fn missing_platform_dir_is_path_resolution_error() {
        let err = Locations::resolve("cache", None, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PathResolutionError);
    }
}
