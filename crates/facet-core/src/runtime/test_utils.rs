//! In-memory runtime for tests.
//!
//! `MemoryRuntime` keeps files in a map, counts reads per path, records every
//! write in order and can be told to fail specific directory reads. Each
//! operation yields to the scheduler first so concurrent walks interleave.

use async_trait::async_trait;
use parking_lot::RwLock;
use path_clean::PathClean;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

#[derive(Debug, Default)]
struct MemoryFs {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    reads: HashMap<PathBuf, usize>,
    writes: Vec<PathBuf>,
    failing_dirs: BTreeSet<PathBuf>,
}

impl MemoryFs {
    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
            || self
                .files
                .keys()
                .chain(self.dirs.iter())
                .any(|p| p != path && p.starts_with(path))
    }
}

/// In-memory filesystem implementing [`Runtime`].
#[derive(Debug)]
pub struct MemoryRuntime {
    cwd: PathBuf,
    fs: RwLock<MemoryFs>,
}

impl MemoryRuntime {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            fs: RwLock::new(MemoryFs::default()),
        }
    }

    fn normalize(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.clean()
        } else {
            self.cwd.join(path).clean()
        }
    }

    /// Add a file; parent directories exist implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = self.normalize(path.as_ref());
        self.fs.write().files.insert(path, content.into());
    }

    /// Add an empty directory.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize(path.as_ref());
        self.fs.write().dirs.insert(path);
    }

    /// Make `read_dir` on this exact directory fail.
    pub fn fail_read_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize(path.as_ref());
        self.fs.write().failing_dirs.insert(path);
    }

    /// Number of successful or failed `read_file` calls for a path.
    pub fn read_count(&self, path: impl AsRef<Path>) -> usize {
        let path = self.normalize(path.as_ref());
        self.fs.read().reads.get(&path).copied().unwrap_or(0)
    }

    /// Total number of `read_file` calls.
    pub fn total_reads(&self) -> usize {
        self.fs.read().reads.values().sum()
    }

    /// Paths written so far, in write order.
    pub fn writes(&self) -> Vec<PathBuf> {
        self.fs.read().writes.clone()
    }

    /// Current content of a file as UTF-8, if present.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        let path = self.normalize(path.as_ref());
        self.fs
            .read()
            .files
            .get(&path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

#[async_trait]
impl Runtime for MemoryRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        tokio::task::yield_now().await;
        let path = self.normalize(path);
        let mut fs = self.fs.write();
        *fs.reads.entry(path.clone()).or_insert(0) += 1;
        fs.files
            .get(&path)
            .cloned()
            .ok_or(RuntimeError::FileNotFound(path))
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()> {
        tokio::task::yield_now().await;
        let path = self.normalize(path);
        let mut fs = self.fs.write();
        fs.writes.push(path.clone());
        fs.files.insert(path, content.to_vec());
        Ok(())
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        tokio::task::yield_now().await;
        let path = self.normalize(path);
        let fs = self.fs.read();
        if let Some(content) = fs.files.get(&path) {
            return Ok(FileMetadata {
                size: content.len() as u64,
                is_dir: false,
                is_file: true,
            });
        }
        if fs.is_dir(&path) {
            return Ok(FileMetadata {
                size: 0,
                is_dir: true,
                is_file: false,
            });
        }
        Err(RuntimeError::FileNotFound(path))
    }

    async fn create_dir(&self, path: &Path, _recursive: bool) -> RuntimeResult<()> {
        let path = self.normalize(path);
        self.fs.write().dirs.insert(path);
        Ok(())
    }

    async fn read_dir(&self, path: &Path) -> RuntimeResult<Vec<String>> {
        tokio::task::yield_now().await;
        let path = self.normalize(path);
        let fs = self.fs.read();
        if fs.failing_dirs.contains(&path) {
            return Err(RuntimeError::Io(format!(
                "Failed to read directory {}: permission denied",
                path.display()
            )));
        }
        if !fs.is_dir(&path) {
            return Err(RuntimeError::FileNotFound(path));
        }

        let names: BTreeSet<String> = fs
            .files
            .keys()
            .chain(fs.dirs.iter())
            .filter_map(|p| p.strip_prefix(&path).ok())
            .filter_map(|rest| rest.components().next())
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(names.into_iter().collect())
    }

    fn get_cwd(&self) -> RuntimeResult<PathBuf> {
        Ok(self.cwd.clone())
    }
}
