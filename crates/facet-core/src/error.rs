//! Error types for the compile pass.

use std::path::PathBuf;

use facet_config::ConfigError;

use crate::runtime::RuntimeError;

/// Result type alias for compile operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Errors raised while walking, transforming and writing the manifest.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// Invalid configuration. Always fatal.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A condition callers must see unchanged, bypassing failure reporting.
    #[error("{0}")]
    Fatal(String),

    /// A source file could not be read.
    #[error("Failed to read '{}': {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    /// The parser rejected a source file.
    #[error("Failed to parse '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// Style processing failed for a component.
    #[error("Failed to process styles for '{}': {source}", .path.display())]
    Style {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// A record already carried component metadata.
    #[error("Component metadata already set for '{}'", .0.display())]
    MetadataAlreadySet(PathBuf),

    /// Writing build output failed.
    #[error("Failed to write '{}': {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    /// The manifest could not be serialized.
    #[error("Failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// A walk task panicked or the task group broke down.
    #[error("Internal error: {0}")]
    Internal(String),

    /// A failure wrapped by the build logger with run context.
    #[error("{task} failed after {elapsed_ms}ms: {source}")]
    Failed {
        task: String,
        elapsed_ms: u64,
        #[source]
        source: Box<CompileError>,
    },
}

impl CompileError {
    /// Fatal errors propagate unchanged instead of being wrapped by the logger.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CompileError::Config(_) | CompileError::Fatal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_and_fatal_errors_are_fatal() {
        let config = CompileError::Config(ConfigError::NotFound(PathBuf::from("/p")));
        assert!(config.is_fatal());
        assert!(CompileError::Fatal("stop".into()).is_fatal());
        assert!(!CompileError::Internal("boom".into()).is_fatal());
    }

    #[test]
    fn parse_error_mentions_path() {
        let err = CompileError::Parse {
            path: PathBuf::from("/src/cmp.tsx"),
            source: anyhow::anyhow!("unexpected token"),
        };
        let message = err.to_string();
        assert!(message.contains("/src/cmp.tsx"));
        assert!(message.contains("unexpected token"));
    }
}
