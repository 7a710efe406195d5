//! Fan a module graph out into its output variants.
//!
//! For each required format the graph is rendered once. The render is then
//! written into every destination of that format: entry modules first, then
//! the lazy chunks for that destination. Shortcut files are written last.

pub mod lazy;
pub mod shortcut;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use facet_config::{CompilerConfig, OutputTarget};
use facet_core::Runtime;
use indexmap::{IndexMap, IndexSet};

use crate::format::{FormatOptions, OutputFormat, entry_file_name};
use crate::output::{validate_output_path, write_output};
use crate::render::{RenderedOutput, Renderer};
use crate::{Error, Result};

pub use lazy::{CORE_PLACEHOLDER, write_lazy_chunks};
pub use shortcut::{Shortcut, plan_shortcuts, relative_import, write_shortcuts};

/// The parts of [`CompilerConfig`] emission depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Names the core entry module, `<namespace>.mjs.js`.
    pub namespace: String,
    pub build_es5: bool,
    pub is_dev: bool,
    pub external_bundler: bool,
}

impl EmitOptions {
    pub fn from_config(config: &CompilerConfig) -> Self {
        Self {
            namespace: config.fs_namespace.clone(),
            build_es5: config.build_es5,
            is_dev: config.is_dev,
            external_bundler: config.external_bundler,
        }
    }
}

/// What a call to [`ModuleEmitter::emit`] produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitSummary {
    /// Formats rendered, in render order. Each was rendered exactly once.
    pub formats: Vec<OutputFormat>,
    /// Every file written, in write order for a given destination.
    pub written: Vec<PathBuf>,
    pub shortcuts: Vec<PathBuf>,
}

impl EmitSummary {
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty() && self.written.is_empty() && self.shortcuts.is_empty()
    }
}

/// Writes rendered module graphs to their output targets.
#[derive(Debug, Clone)]
pub struct ModuleEmitter {
    runtime: Arc<dyn Runtime>,
    options: EmitOptions,
}

impl ModuleEmitter {
    pub fn new(runtime: Arc<dyn Runtime>, options: EmitOptions) -> Self {
        Self { runtime, options }
    }

    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    /// Formats to render and their destinations, deduplicated in target order.
    ///
    /// Modern is required when any target has a `modern_dir`. Legacy is
    /// required only when `build_es5` is set and some target has a
    /// `legacy_dir`.
    pub fn required_formats(
        &self,
        targets: &[OutputTarget],
    ) -> IndexMap<OutputFormat, IndexSet<PathBuf>> {
        let mut formats: IndexMap<OutputFormat, IndexSet<PathBuf>> = IndexMap::new();
        for target in targets {
            if let Some(dir) = &target.modern_dir {
                formats
                    .entry(OutputFormat::Modern)
                    .or_default()
                    .insert(dir.clone());
            }
        }
        if self.options.build_es5 {
            for target in targets {
                if let Some(dir) = &target.legacy_dir {
                    formats
                        .entry(OutputFormat::Legacy)
                        .or_default()
                        .insert(dir.clone());
                }
            }
        }
        formats
    }

    /// Render `graph` per required format and write everything out.
    ///
    /// With no required format this returns an empty summary without
    /// touching the filesystem. A render failure stops emission; files
    /// written before it stay on disk.
    pub async fn emit<G: Sync>(
        &self,
        graph: &G,
        renderer: &dyn Renderer<G>,
        targets: &[OutputTarget],
    ) -> Result<EmitSummary> {
        let formats = self.required_formats(targets);
        if formats.is_empty() {
            tracing::debug!("No output target requests a build, skipping emit");
            return Ok(EmitSummary::default());
        }

        let mut summary = EmitSummary::default();
        for (format, destinations) in formats {
            let options =
                FormatOptions::for_format(format, self.options.is_dev, self.options.external_bundler);
            let rendered = renderer
                .render(graph, &options)
                .await
                .map_err(|source| Error::Render { format, source })?;
            summary.formats.push(format);

            tracing::debug!(
                "Rendered {} output: {} chunks for {} destinations",
                format,
                rendered.chunks.len(),
                destinations.len()
            );

            for dest in &destinations {
                let written = self.write_destination(dest, &rendered).await?;
                summary.written.extend(written);
            }
        }

        summary.shortcuts =
            write_shortcuts(self.runtime.as_ref(), targets, &self.options).await?;

        tracing::info!(
            "Emitted {} files and {} shortcuts",
            summary.written.len(),
            summary.shortcuts.len()
        );
        Ok(summary)
    }

    async fn write_destination(
        &self,
        dest: &Path,
        rendered: &RenderedOutput,
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for chunk in rendered.entries() {
            let path = validate_output_path(dest, &chunk.file_name)?;
            write_output(self.runtime.as_ref(), &path, chunk.code.as_bytes()).await?;
            written.push(path);
        }

        let core_entry = dest.join(entry_file_name(&self.options.namespace));
        let lazy = write_lazy_chunks(self.runtime.as_ref(), dest, rendered, &core_entry).await?;
        written.extend(lazy);
        Ok(written)
    }
}
