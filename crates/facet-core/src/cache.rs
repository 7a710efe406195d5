//! Per-build file record cache.
//!
//! Maps an absolute path to one shared [`FileRecord`]. The cache lives for a
//! single build run and never evicts.
//!
//! # Concurrent first access
//!
//! The first request for a path installs an in-flight `OnceCell` while the
//! map lock is held. Every concurrent request for the same path awaits that
//! cell, so a file is read once no matter how many tasks ask for it. A failed
//! read leaves the cell empty and the next request retries.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use tokio::sync::OnceCell;

use crate::error::{CompileError, Result};
use crate::file::FileRecord;
use crate::runtime::Runtime;

/// Shared handle to a record; collaborators mutate it in place.
pub type SharedFile = Arc<tokio::sync::Mutex<FileRecord>>;

type Slot = Arc<OnceCell<SharedFile>>;

/// Get-or-create store of file records for one build.
#[derive(Debug)]
pub struct FileRecordCache {
    runtime: Arc<dyn Runtime>,
    enabled: bool,
    entries: Mutex<IndexMap<PathBuf, Slot>>,
}

impl FileRecordCache {
    pub fn new(runtime: Arc<dyn Runtime>, enabled: bool) -> Self {
        Self {
            runtime,
            enabled,
            entries: Mutex::new(IndexMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Return the record for `path`, reading the file on first access.
    ///
    /// With caching disabled every call reads the file and returns an
    /// independent record.
    pub async fn get_file(&self, path: &Path) -> Result<SharedFile> {
        if !self.enabled {
            return self.read_record(path).await;
        }

        let slot = {
            let mut entries = self.entries.lock();
            Arc::clone(entries.entry(path.to_path_buf()).or_default())
        };

        slot.get_or_try_init(|| self.read_record(path))
            .await
            .cloned()
    }

    async fn read_record(&self, path: &Path) -> Result<SharedFile> {
        let src_text =
            self.runtime
                .read_to_string(path)
                .await
                .map_err(|source| CompileError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                })?;

        tracing::trace!("Read {} ({} bytes)", path.display(), src_text.len());
        Ok(Arc::new(tokio::sync::Mutex::new(FileRecord::new(
            path, src_text,
        ))))
    }

    /// Cached record for `path`, if it finished loading.
    pub fn get(&self, path: &Path) -> Option<SharedFile> {
        self.entries
            .lock()
            .get(path)
            .and_then(|slot| slot.get().cloned())
    }

    /// Loaded records in first-request order.
    pub fn records(&self) -> Vec<SharedFile> {
        self.entries
            .lock()
            .values()
            .filter_map(|slot| slot.get().cloned())
            .collect()
    }

    /// Paths with a loaded record, in first-request order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries
            .lock()
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Number of loaded records.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
