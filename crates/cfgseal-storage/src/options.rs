use std::{fs, path::Path};

use cfgseal_core::error::{storage_err, ConfigStoreError, StoreResult};
use serde::{Deserialize, Serialize};

/// How a save replaces the backing file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Truncate and rewrite in place. A crash mid-write can leave a torn frame.
    #[default]
    Truncate,
    /// Write a temp file in the same directory, then rename it over the target.
    Atomic,
}

/// Tunables for a file-backed store, usually embedded in the host app's config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    pub write_mode: WriteMode,
    /// Create missing parent directories when opening the store.
    pub create_parent_dirs: bool,
}

impl StoreOptions {
    /// Parse options from a TOML document.
    pub fn from_toml_str(contents: &str) -> StoreResult<Self> {
        toml::from_str(contents).map_err(|e| ConfigStoreError::Serialization {
            reason: format!("invalid store options: {e}"),
        })
    }

    /// Load options from a TOML file; if missing or empty, return defaults.
    pub fn load_from_path(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(storage_err)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_default_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let opts = StoreOptions::load_from_path(dir.path().join("store.toml")).expect("load");
        assert_eq!(opts, StoreOptions::default());
        assert_eq!(opts.write_mode, WriteMode::Truncate);
        assert!(!opts.create_parent_dirs);
    }

    #[test]
    fn returns_default_when_blank() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.toml");
        fs::write(&path, "  \n").expect("write");
        let opts = StoreOptions::load_from_path(&path).expect("load");
        assert_eq!(opts, StoreOptions::default());
    }

    #[test]
    fn parses_custom_options() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.toml");
        fs::write(
            &path,
            r#"
                write_mode = "atomic"
                create_parent_dirs = true
            "#,
        )
        .expect("write temp options");

        let opts = StoreOptions::load_from_path(&path).expect("load");
        assert_eq!(
            opts,
            StoreOptions {
                write_mode: WriteMode::Atomic,
                create_parent_dirs: true,
            }
        );
    }

    #[test]
    fn partial_options_fill_defaults() {
        let opts = StoreOptions::from_toml_str("create_parent_dirs = true").expect("parse");
        assert_eq!(opts.write_mode, WriteMode::Truncate);
        assert!(opts.create_parent_dirs);
    }

    #[test]
    fn unknown_write_mode_is_rejected() {
        let err = StoreOptions::from_toml_str("write_mode = \"sometimes\"")
            .expect_err("should reject");
        assert!(matches!(err, ConfigStoreError::Serialization { .. }));
    }
}
