//! # facet-config
//!
//! Configuration for the Facet component compiler: the [`CompilerConfig`]
//! consumed by the build pipeline, its [`OutputTarget`] list, documented
//! defaults, one-shot validation and file discovery.

pub mod config;
pub mod discovery;
pub mod error;

pub use config::{
    CompilerConfig, DEFAULT_DEPENDENCY_DIR, DEFAULT_MAX_OPEN_FILES, DEFAULT_NAMESPACE,
    OutputTarget,
};
pub use discovery::{ConfigDiscovery, ConfigSource, discover};
pub use error::{ConfigError, Result};
