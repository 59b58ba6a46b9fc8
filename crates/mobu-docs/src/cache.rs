//! On-disk HTML page cache.
//!
//! Keyed by a filesystem-safe transform of the URL. Writes go through a
//! temp file in the same directory followed by a rename, so a concurrent
//! writer to the same key can at worst overwrite a complete file, never
//! leave a truncated one.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DocsError, Result};
use crate::url::cache_key;

#[derive(Debug)]
pub struct PageCache {
    dir: PathBuf,
}

impl PageCache {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| DocsError::Cache {
            path: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(cache_key(url))
    }

    pub fn get(&self, url: &str) -> Option<String> {
        fs::read_to_string(self.path_for(url)).ok()
    }

    pub fn put(&self, url: &str, body: &str) -> Result<()> {
        let path = self.path_for(url);
        // Process-unique temp name, renamed into place once fully written.
        let tmp = self
            .dir
            .join(format!(".{}.{}", cache_key(url), std::process::id()));
        fs::write(&tmp, body).map_err(|source| DocsError::Cache {
            path: tmp.display().to_string(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| DocsError::Cache {
            path: path.display().to_string(),
            source,
        })?;
        Ok(())
    }
}
