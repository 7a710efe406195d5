//! Contracts for the external bundler and renderer.
//!
//! A [`Bundler`] turns the transformed source files into an opaque module
//! graph `G`. A [`Renderer`] turns that graph into code for one set of
//! [`FormatOptions`]; the same graph may be rendered several times.

use async_trait::async_trait;
use facet_core::FileRecord;

use crate::format::FormatOptions;

/// Resolves transformed files into a module graph.
#[async_trait]
pub trait Bundler<G>: Send + Sync {
    async fn bundle(&self, files: &[FileRecord]) -> anyhow::Result<G>;
}

/// Renders a module graph for one output format.
#[async_trait]
pub trait Renderer<G: Sync>: Send + Sync {
    async fn render(&self, graph: &G, options: &FormatOptions) -> anyhow::Result<RenderedOutput>;
}

/// One rendered file, named relative to its destination directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChunk {
    pub file_name: String,
    pub code: String,
    pub is_entry: bool,
}

impl RenderedChunk {
    pub fn entry(file_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            code: code.into(),
            is_entry: true,
        }
    }

    pub fn lazy(file_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            code: code.into(),
            is_entry: false,
        }
    }
}

/// Result of a single render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedOutput {
    pub chunks: Vec<RenderedChunk>,
}

impl RenderedOutput {
    pub fn new(chunks: Vec<RenderedChunk>) -> Self {
        Self { chunks }
    }

    pub fn entries(&self) -> impl Iterator<Item = &RenderedChunk> {
        self.chunks.iter().filter(|c| c.is_entry)
    }

    /// Chunks loaded on demand.
    pub fn lazy_chunks(&self) -> impl Iterator<Item = &RenderedChunk> {
        self.chunks.iter().filter(|c| !c.is_entry)
    }
}
