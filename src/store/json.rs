//! File-backed store: one `<key>.json` file per entity key.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::Store;
use crate::config::StorageConfig;
use crate::error::{Error, Result};

/// A store reading entity arrays from a directory of JSON files.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open the store configured in `config`, falling back to `data_dir`.
    ///
    /// The directory must exist; nothing is created.
    pub fn open(config: &StorageConfig, data_dir: &Path) -> Result<Self> {
        let dir = config
            .path
            .as_ref()
            .map_or_else(|| data_dir.to_path_buf(), PathBuf::from);
        Self::at(dir)
    }

    /// Open the store rooted at `dir`.
    pub fn at(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(Error::storage(format!(
                "storage directory {} does not exist",
                dir.display()
            )));
        }
        debug!("Using storage directory {:?}", dir);
        Ok(Self { dir })
    }

    /// Directory the store reads from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the value for `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Store for JsonStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
