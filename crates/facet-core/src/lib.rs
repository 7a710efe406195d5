//! # facet-core
//!
//! The compile half of the Facet component compiler.
//!
//! A build walks a source directory once, reads every TypeScript source file
//! into a per-build [`FileRecordCache`], runs an external [`Parser`] and
//! [`StyleProcessor`] over files that declare components, and writes a
//! [`Manifest`] of the discovered components to `<dest_dir>/manifest.json`.
//!
//! ```no_run
//! use std::sync::Arc;
//! use facet_config::CompilerConfig;
//! use facet_core::{
//!     CompilerContext, FileRecord, NativeRuntime, NoopStyleProcessor, Parser, TracingLogger,
//!     compile_components,
//! };
//!
//! struct MyParser;
//!
//! impl Parser for MyParser {
//!     fn parse(&self, _file: &mut FileRecord) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = CompilerContext::new(
//!     CompilerConfig::new("src", "www"),
//!     Arc::new(NativeRuntime::new()),
//!     Arc::new(MyParser),
//!     Arc::new(NoopStyleProcessor),
//! )?;
//! let output = compile_components(&ctx, &TracingLogger::start("compile")).await?;
//! println!("{} components", output.manifest.components.len());
//! # Ok(()) }
//! ```

pub mod cache;
pub mod compile;
pub mod error;
pub mod file;
pub mod logger;
pub mod manifest;
pub mod runtime;
pub mod transform;
pub mod walker;

pub use cache::{FileRecordCache, SharedFile};
pub use compile::{CompileOutput, CompilerContext, compile, compile_components};
pub use error::{CompileError, Result};
pub use file::{COMPONENT_DECORATOR, FileRecord, is_source_file, is_transformable};
pub use logger::{BuildLogger, TracingLogger};
pub use manifest::{ComponentDescriptor, MANIFEST_FILE_NAME, Manifest, StyleData};
pub use runtime::{FileMetadata, NativeRuntime, Runtime, RuntimeError, RuntimeResult};
pub use transform::{FileTransformer, NoopStyleProcessor, Parser, StyleProcessor};
pub use walker::SourceTreeWalker;

#[cfg(any(test, feature = "test-utils"))]
pub use runtime::test_utils;
