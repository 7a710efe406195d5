#![cfg_attr(docsrs, feature(doc_cfg))]

//! # facet-bundler
//!
//! Turns a bundled module graph into the physical output of a Facet app.
//!
//! The graph is rendered once per required [`OutputFormat`], entry files and
//! lazy chunks are written into every destination of that format, and
//! shortcut files re-export each target's real entry point.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use facet_bundler::{EmitOptions, ModuleEmitter, Renderer};
//! use facet_config::CompilerConfig;
//! use facet_core::NativeRuntime;
//!
//! # async fn example<G: Sync>(graph: G, renderer: &dyn Renderer<G>) -> facet_bundler::Result<()> {
//! let config = CompilerConfig::load(".")?;
//! let emitter = ModuleEmitter::new(Arc::new(NativeRuntime::new()), EmitOptions::from_config(&config));
//! let summary = emitter.emit(&graph, renderer, &config.output_targets).await?;
//! println!("wrote {} files", summary.written.len());
//! # Ok(()) }
//! ```

use std::path::PathBuf;

use facet_core::{CompileError, RuntimeError};

pub mod emit;
pub mod format;
pub mod output;
pub mod pipeline;
pub mod render;

pub use emit::{EmitOptions, EmitSummary, ModuleEmitter, relative_import};
pub use format::{FormatOptions, OutputFormat, SourceTarget};
pub use pipeline::{AppBuild, build_app};
pub use render::{Bundler, RenderedChunk, RenderedOutput, Renderer};

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

/// Error types for facet-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The compile pass failed.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Configuration could not be loaded or is invalid.
    #[error("Invalid configuration: {0}")]
    Config(#[from] facet_config::ConfigError),

    /// The external bundler failed to produce a module graph.
    #[error("Bundler error: {0}")]
    Bundle(#[source] anyhow::Error),

    /// Rendering the graph for one format failed.
    #[error("Failed to render {format} output: {source}")]
    Render {
        format: OutputFormat,
        #[source]
        source: anyhow::Error,
    },

    /// Invalid output path (e.g., directory traversal attempt).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// File write operation failed.
    #[error("Failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },
}

/// Result type alias for facet-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Errors callers must distinguish from ordinary build failures.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Compile(err) => err.is_fatal(),
            Error::Config(_) => true,
            _ => false,
        }
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Compile(_) => "COMPILE_ERROR",
            Error::Config(_) => "INVALID_CONFIG",
            Error::Bundle(_) => "BUNDLER_ERROR",
            Error::Render { .. } => "RENDER_ERROR",
            Error::InvalidOutputPath(_) => "INVALID_OUTPUT_PATH",
            Error::WriteFailure { .. } => "WRITE_FAILURE",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::Config(err) => Some(Box::new(format!(
                "Check facet.toml or the \"facet\" field in package.json.\nError: {}",
                err
            ))),
            Error::InvalidOutputPath(path) => Some(Box::new(format!(
                "The output path '{}' is invalid. Chunk names must stay inside their destination and must not contain '..' components.",
                path
            ))),
            Error::WriteFailure { path, .. } => Some(Box::new(format!(
                "Failed to write '{}'. Check disk space and permissions.\nFiles written before this one are left in place.",
                path.display()
            ))),
            Error::Render { format, .. } => Some(Box::new(format!(
                "The renderer rejected the {} format options. Files already emitted for earlier formats are left in place.",
                format
            ))),
            _ => None,
        }
    }
}
