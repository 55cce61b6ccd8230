use std::{
    fs::{self, File, OpenOptions},
    io::{Read, Write},
    path::Path,
};

use cfgseal_core::{
    error::{storage_err, ConfigStoreError, StoreResult},
    storage::Backend,
};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::options::{StoreOptions, WriteMode};

/// `Backend` over the local file system.
#[derive(Debug, Clone, Default)]
pub struct FileBackend {
    write_mode: WriteMode,
    create_parent_dirs: bool,
}

impl FileBackend {
    pub fn new(write_mode: WriteMode) -> Self {
        Self {
            write_mode,
            create_parent_dirs: false,
        }
    }

    pub fn from_options(options: &StoreOptions) -> Self {
        Self {
            write_mode: options.write_mode,
            create_parent_dirs: options.create_parent_dirs,
        }
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    fn ensure_parent(&self, path: &Path) -> StoreResult<()> {
        if !self.create_parent_dirs {
            return Ok(());
        }
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|e| path_err("create dir", parent, e))
            }
            _ => Ok(()),
        }
    }
}

impl Backend for FileBackend {
    fn exists(&self, path: &Path) -> bool {
        // A stat failure reports false; `create` then surfaces the real error.
        path.try_exists().unwrap_or(false)
    }

    /// Create `path` if absent. Never truncates, so a file that appeared since
    /// `exists` was checked keeps its frame.
    fn create(&self, path: &Path) -> StoreResult<()> {
        self.ensure_parent(path)?;
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| path_err("create", path, e))?;
        debug!(path = %path.display(), "ensured backing file exists");
        Ok(())
    }

    fn read_all(&self, path: &Path) -> StoreResult<Vec<u8>> {
        let mut file = File::open(path).map_err(|e| path_err("open", path, e))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .map_err(|e| path_err("read", path, e))?;
        Ok(buf)
    }

    fn write_all(&self, path: &Path, bytes: &[u8]) -> StoreResult<()> {
        match self.write_mode {
            WriteMode::Truncate => write_truncate(path, bytes),
            WriteMode::Atomic => write_atomic(path, bytes),
        }
    }
}

/// Truncate then write in place. A failure part way leaves the file undefined.
fn write_truncate(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| path_err("open", path, e))?;
    file.write_all(bytes)
        .map_err(|e| path_err("write", path, e))?;
    file.sync_all().map_err(|e| path_err("sync", path, e))?;
    Ok(())
}

/// Write a sibling temp file and rename it over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent).map_err(storage_err)?;
    tmp.write_all(bytes).map_err(storage_err)?;
    tmp.as_file().sync_all().map_err(storage_err)?;
    tmp.persist(path).map_err(|e| storage_err(e.error))?;
    Ok(())
}

fn path_err(action: &str, path: &Path, err: std::io::Error) -> ConfigStoreError {
    ConfigStoreError::Storage {
        reason: format!("{action} {}: {err}", path.display()),
    }
}
