//! Per-file transform policy.
//!
//! Decides whether a record is eligible, runs the parser on it and, when the
//! parser found a component, runs the style processor.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::{FileRecordCache, SharedFile};
use crate::error::{CompileError, Result};
use crate::file::FileRecord;

/// Extracts component metadata from source text.
///
/// Implementations attach metadata with [`FileRecord::set_component_meta`]
/// and may replace the decorator-stripped text. Leaving the metadata unset
/// marks the file as ordinary.
pub trait Parser: Send + Sync {
    fn parse(&self, file: &mut FileRecord) -> anyhow::Result<()>;
}

/// Attaches or rewrites style data on a parsed component.
#[async_trait]
pub trait StyleProcessor: Send + Sync {
    async fn process(&self, file: &mut FileRecord) -> anyhow::Result<()>;
}

/// Style processor that leaves components untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStyleProcessor;

#[async_trait]
impl StyleProcessor for NoopStyleProcessor {
    async fn process(&self, _file: &mut FileRecord) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Runs the parser and style processor over eligible records.
#[derive(Clone)]
pub struct FileTransformer {
    parser: Arc<dyn Parser>,
    styles: Arc<dyn StyleProcessor>,
}

impl std::fmt::Debug for FileTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileTransformer").finish_non_exhaustive()
    }
}

impl FileTransformer {
    pub fn new(parser: Arc<dyn Parser>, styles: Arc<dyn StyleProcessor>) -> Self {
        Self { parser, styles }
    }

    /// Transform one record in place.
    ///
    /// Returns `true` when the record carries component metadata afterwards.
    /// A record that is already a component is left untouched.
    pub async fn transform(&self, file: &SharedFile) -> Result<bool> {
        let mut record = file.lock().await;
        if !record.is_source_file || !record.is_transformable {
            return Ok(false);
        }
        if record.is_component() {
            return Ok(true);
        }

        self.parser.parse(&mut record).map_err(|source| {
            plugin_error(source, |source| CompileError::Parse {
                path: record.file_path.clone(),
                source,
            })
        })?;

        if !record.is_component() {
            tracing::trace!("{} has no component", record.file_path.display());
            return Ok(false);
        }

        self.styles
            .process(&mut record)
            .await
            .map_err(|source| {
                plugin_error(source, |source| CompileError::Style {
                    path: record.file_path.clone(),
                    source,
                })
            })?;

        tracing::debug!("Transformed component {}", record.file_path.display());
        Ok(true)
    }

    /// Fetch a file through the cache and transform it.
    pub async fn transform_path(&self, cache: &FileRecordCache, path: &Path) -> Result<SharedFile> {
        let file = cache.get_file(path).await?;
        self.transform(&file).await?;
        Ok(file)
    }
}

/// Fatal errors raised by a plugin pass through unwrapped.
fn plugin_error(
    source: anyhow::Error,
    wrap: impl FnOnce(anyhow::Error) -> CompileError,
) -> CompileError {
    match source.downcast::<CompileError>() {
        Ok(err) if err.is_fatal() => err,
        Ok(err) => wrap(err.into()),
        Err(source) => wrap(source),
    }
}
