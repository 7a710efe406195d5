//! Per-format render options.

use serde::{Deserialize, Serialize};

/// File name pattern for entry modules.
pub const ENTRY_FILE_NAMES: &str = "[name].mjs.js";

/// Chunk file name pattern in development builds.
pub const DEV_CHUNK_FILE_NAMES: &str = "[name]-[hash].js";

/// Chunk file name pattern in production builds.
pub const CHUNK_FILE_NAMES: &str = "[hash].js";

/// Loader function legacy chunks call instead of native `import()`.
pub const DYNAMIC_IMPORT_SHIM: &str = "__facet_import";

/// Module format of one rendered output variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ES modules with native dynamic import.
    Modern,
    /// ES5-compatible output for older browsers.
    Legacy,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Modern => "modern",
            OutputFormat::Legacy => "legacy",
        }
    }

    pub fn source_target(&self) -> SourceTarget {
        match self {
            OutputFormat::Modern => SourceTarget::Es2017,
            OutputFormat::Legacy => SourceTarget::Es5,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language level the renderer transpiles down to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTarget {
    Es2017,
    Es5,
}

/// Options handed to a [`Renderer`](crate::Renderer) for one format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatOptions {
    pub format: OutputFormat,
    pub source_target: SourceTarget,
    pub entry_file_names: String,
    pub chunk_file_names: String,
    /// Function that replaces `import()` in the rendered code, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_import_function: Option<String>,
}

impl FormatOptions {
    /// Options for `format`.
    ///
    /// With `external_bundler` set, legacy output keeps plain `import()` calls
    /// so the host bundler can resolve them.
    pub fn for_format(format: OutputFormat, is_dev: bool, external_bundler: bool) -> Self {
        let chunk_file_names = if is_dev {
            DEV_CHUNK_FILE_NAMES
        } else {
            CHUNK_FILE_NAMES
        };

        let dynamic_import_function = match format {
            OutputFormat::Legacy if !external_bundler => Some(DYNAMIC_IMPORT_SHIM.to_string()),
            _ => None,
        };

        Self {
            format,
            source_target: format.source_target(),
            entry_file_names: ENTRY_FILE_NAMES.to_string(),
            chunk_file_names: chunk_file_names.to_string(),
            dynamic_import_function,
        }
    }
}

/// Entry file name for a module named `name`.
pub fn entry_file_name(name: &str) -> String {
    ENTRY_FILE_NAMES.replace("[name]", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modern_uses_native_import() {
        let options = FormatOptions::for_format(OutputFormat::Modern, false, false);
        assert_eq!(options.source_target, SourceTarget::Es2017);
        assert_eq!(options.entry_file_names, "[name].mjs.js");
        assert_eq!(options.chunk_file_names, "[hash].js");
        assert!(options.dynamic_import_function.is_none());
    }

    #[test]
    fn legacy_routes_imports_through_shim() {
        let options = FormatOptions::for_format(OutputFormat::Legacy, true, false);
        assert_eq!(options.source_target, SourceTarget::Es5);
        assert_eq!(options.chunk_file_names, "[name]-[hash].js");
        assert_eq!(
            options.dynamic_import_function.as_deref(),
            Some(DYNAMIC_IMPORT_SHIM)
        );
    }

    #[test]
    fn external_bundler_keeps_plain_imports() {
        let options = FormatOptions::for_format(OutputFormat::Legacy, false, true);
        assert!(options.dynamic_import_function.is_none());
    }

    #[test]
    fn entry_names() {
        assert_eq!(entry_file_name("app"), "app.mjs.js");
        assert_eq!(entry_file_name("index"), "index.mjs.js");
    }
}
