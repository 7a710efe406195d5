//! Compile pass: walk the source tree, then write the component manifest.

use std::path::Path;
use std::sync::Arc;

use facet_config::CompilerConfig;

use crate::cache::{FileRecordCache, SharedFile};
use crate::error::Result;
use crate::file::FileRecord;
use crate::logger::BuildLogger;
use crate::manifest::Manifest;
use crate::runtime::Runtime;
use crate::transform::{FileTransformer, Parser, StyleProcessor};
use crate::walker::SourceTreeWalker;

/// State owned by one build run.
///
/// The file cache lives here and is dropped with the context, so nothing
/// carries over between runs.
#[derive(Debug)]
pub struct CompilerContext {
    config: CompilerConfig,
    runtime: Arc<dyn Runtime>,
    cache: Arc<FileRecordCache>,
    transformer: FileTransformer,
}

impl CompilerContext {
    /// Validate `config` and set up a fresh cache.
    pub fn new(
        config: CompilerConfig,
        runtime: Arc<dyn Runtime>,
        parser: Arc<dyn Parser>,
        styles: Arc<dyn StyleProcessor>,
    ) -> Result<Self> {
        config.validate()?;
        let cache = Arc::new(FileRecordCache::new(
            Arc::clone(&runtime),
            config.cache_files,
        ));
        Ok(Self {
            config,
            runtime,
            cache,
            transformer: FileTransformer::new(parser, styles),
        })
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn runtime(&self) -> &Arc<dyn Runtime> {
        &self.runtime
    }

    pub fn cache(&self) -> &FileRecordCache {
        &self.cache
    }

    /// Transform a single file outside of a walk.
    pub async fn transform_file(&self, path: &Path) -> Result<SharedFile> {
        self.transformer.transform_path(&self.cache, path).await
    }

    fn walker(&self) -> SourceTreeWalker {
        SourceTreeWalker::new(
            Arc::clone(&self.runtime),
            Arc::clone(&self.cache),
            self.transformer.clone(),
            self.config.dependency_dir.clone(),
            self.config.max_open_files,
        )
    }
}

/// Result of a successful compile pass.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub manifest: Manifest,
    /// Snapshot of every walked source file after transformation.
    pub files: Vec<FileRecord>,
}

impl CompileOutput {
    /// Records that were recognized as components.
    pub fn components(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.iter().filter(|f| f.is_component())
    }
}

/// Walk the source tree, then build and write the manifest.
///
/// The manifest is written only after every file task has settled.
pub async fn compile(ctx: &CompilerContext) -> Result<CompileOutput> {
    let walked = ctx.walker().walk(&ctx.config.src_dir).await?;

    // Cache order when caching is on; otherwise the walk itself is the only record.
    let records = if ctx.cache.is_enabled() {
        ctx.cache.records()
    } else {
        walked
    };

    let mut files = Vec::with_capacity(records.len());
    for record in &records {
        files.push(record.lock().await.clone());
    }

    let manifest = Manifest::new(
        files
            .iter()
            .filter_map(|f| f.component_meta().cloned())
            .collect(),
    );
    manifest
        .write(ctx.runtime.as_ref(), &ctx.config.dest_dir)
        .await?;

    tracing::debug!(
        "Wrote manifest with {} components to {}",
        manifest.components.len(),
        ctx.config.manifest_path().display()
    );

    Ok(CompileOutput { manifest, files })
}

/// Run [`compile`] and report the outcome through `logger`.
///
/// Fatal errors propagate unchanged; anything else goes through
/// [`BuildLogger::fail`].
pub async fn compile_components(
    ctx: &CompilerContext,
    logger: &dyn BuildLogger,
) -> Result<CompileOutput> {
    match compile(ctx).await {
        Ok(output) => {
            logger.finish();
            Ok(output)
        }
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => Err(logger.fail(err)),
    }
}
