//! Concurrent source tree walker.
//!
//! Every child of a directory is spawned onto a `JoinSet`; a directory is
//! done once all of its children settle. Sibling order is not preserved.
//!
//! Failure handling:
//! - an unreadable directory or entry is logged and contributes no files
//! - a failed file transform fails the walk, after in-flight siblings finish

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::cache::{FileRecordCache, SharedFile};
use crate::error::{CompileError, Result};
use crate::file::is_source_file;
use crate::runtime::Runtime;
use crate::transform::FileTransformer;

/// Walks a source tree and transforms every source file in it.
#[derive(Debug, Clone)]
pub struct SourceTreeWalker {
    inner: Arc<WalkerInner>,
}

#[derive(Debug)]
struct WalkerInner {
    runtime: Arc<dyn Runtime>,
    cache: Arc<FileRecordCache>,
    transformer: FileTransformer,
    dependency_dir: String,
    permits: Semaphore,
}

impl SourceTreeWalker {
    pub fn new(
        runtime: Arc<dyn Runtime>,
        cache: Arc<FileRecordCache>,
        transformer: FileTransformer,
        dependency_dir: impl Into<String>,
        max_open_files: usize,
    ) -> Self {
        Self {
            inner: Arc::new(WalkerInner {
                runtime,
                cache,
                transformer,
                dependency_dir: dependency_dir.into(),
                permits: Semaphore::new(max_open_files.max(1)),
            }),
        }
    }

    /// Walk `root` to completion.
    ///
    /// Returns every transformed record in completion order.
    pub async fn walk(&self, root: &Path) -> Result<Vec<SharedFile>> {
        let files = Arc::clone(&self.inner).walk_dir(root.to_path_buf()).await?;
        tracing::debug!("Walked {} source files under {}", files.len(), root.display());
        Ok(files)
    }
}

enum Entry {
    Dir(PathBuf),
    File(PathBuf),
}

impl WalkerInner {
    fn walk_dir(self: Arc<Self>, dir: PathBuf) -> BoxFuture<'static, Result<Vec<SharedFile>>> {
        Box::pin(async move {
            let names = {
                let _permit = self.acquire().await?;
                match self.runtime.read_dir(&dir).await {
                    Ok(names) => names,
                    Err(e) => {
                        tracing::warn!("Skipping unreadable directory {}: {}", dir.display(), e);
                        return Ok(Vec::new());
                    }
                }
            };

            let mut tasks = JoinSet::new();
            for name in names {
                let path = dir.join(&name);
                if self.is_dependency_path(&path) {
                    continue;
                }

                let walker = Arc::clone(&self);
                tasks.spawn(async move {
                    match walker.classify(path).await? {
                        Some(Entry::Dir(path)) => walker.walk_dir(path).await,
                        Some(Entry::File(path)) => {
                            let file = walker.transform_file(&path).await?;
                            Ok(vec![file])
                        }
                        None => Ok(Vec::new()),
                    }
                });
            }

            let mut files = Vec::new();
            let mut first_error = None;
            while let Some(joined) = tasks.join_next().await {
                let result = joined
                    .map_err(|e| CompileError::Internal(format!("walk task panicked: {}", e)))
                    .and_then(|r| r);
                match result {
                    Ok(found) => files.extend(found),
                    Err(e) => {
                        if first_error.is_none() {
                            first_error = Some(e);
                        }
                    }
                }
            }

            match first_error {
                Some(e) => Err(e),
                None => Ok(files),
            }
        })
    }

    async fn classify(&self, path: PathBuf) -> Result<Option<Entry>> {
        let metadata = {
            let _permit = self.acquire().await?;
            self.runtime.metadata(&path).await
        };

        match metadata {
            Ok(meta) if meta.is_dir => Ok(Some(Entry::Dir(path))),
            Ok(_) if is_source_file(&path) => Ok(Some(Entry::File(path))),
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    async fn transform_file(&self, path: &Path) -> Result<SharedFile> {
        let file = {
            let _permit = self.acquire().await?;
            self.cache.get_file(path).await?
        };
        self.transformer.transform(&file).await?;
        Ok(file)
    }

    async fn acquire(&self) -> Result<tokio::sync::SemaphorePermit<'_>> {
        self.permits
            .acquire()
            .await
            .map_err(|_| CompileError::Internal("file handle pool closed".to_string()))
    }

    fn is_dependency_path(&self, path: &Path) -> bool {
        path.components()
            .any(|c| matches!(c, Component::Normal(name) if name == self.dependency_dir.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileRecord;
    use crate::manifest::ComponentDescriptor;
    use crate::runtime::test_utils::MemoryRuntime;
    use crate::transform::{NoopStyleProcessor, Parser};

    struct DecoratorParser;

    impl Parser for DecoratorParser {
        fn parse(&self, file: &mut FileRecord) -> anyhow::Result<()> {
            if file.src_text.contains("@Component(") {
                let name = file.file_name.clone();
                let tag = name.trim_end_matches(".tsx").to_string();
                file.set_component_meta(ComponentDescriptor::new(tag, "Cmp", name))?;
            }
            Ok(())
        }
    }

    fn walker(runtime: Arc<MemoryRuntime>, cache: Arc<FileRecordCache>) -> SourceTreeWalker {
        let transformer =
            FileTransformer::new(Arc::new(DecoratorParser), Arc::new(NoopStyleProcessor));
        SourceTreeWalker::new(runtime, cache, transformer, "node_modules", 4)
    }

    #[tokio::test]
    async fn skips_dependency_directories_without_reading() {
        let runtime = Arc::new(MemoryRuntime::new("/"));
        runtime.add_file("/src/a.ts", "export const a = 1;");
        runtime.add_file("/src/node_modules/dep/c.ts", "@Component({})");
        let cache = Arc::new(FileRecordCache::new(runtime.clone(), true));

        let files = walker(runtime.clone(), cache.clone())
            .walk(Path::new("/src"))
            .await
            .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(runtime.read_count("/src/node_modules/dep/c.ts"), 0);
    }

    #[tokio::test]
    async fn ignores_non_source_files() {
        let runtime = Arc::new(MemoryRuntime::new("/"));
        runtime.add_file("/src/a.ts", "a");
        runtime.add_file("/src/b.d.ts", "declare const b: number;");
        runtime.add_file("/src/styles.css", "a{}");
        let cache = Arc::new(FileRecordCache::new(runtime.clone(), true));

        walker(runtime.clone(), cache.clone())
            .walk(Path::new("/src"))
            .await
            .unwrap();

        assert_eq!(cache.paths(), vec![PathBuf::from("/src/a.ts")]);
        assert_eq!(runtime.total_reads(), 1);
    }

    #[tokio::test]
    async fn missing_root_yields_nothing() {
        let runtime = Arc::new(MemoryRuntime::new("/"));
        let cache = Arc::new(FileRecordCache::new(runtime.clone(), true));

        let files = walker(runtime, cache).walk(Path::new("/nope")).await.unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn dependency_match_is_by_component_name() {
        let runtime = Arc::new(MemoryRuntime::new("/"));
        let cache = Arc::new(FileRecordCache::new(runtime.clone(), true));
        let walker = walker(runtime, cache);

        assert!(walker.inner.is_dependency_path(Path::new("/src/node_modules/x.ts")));
        assert!(!walker.inner.is_dependency_path(Path::new("/src/my_node_modules_copy/x.ts")));
    }
}
