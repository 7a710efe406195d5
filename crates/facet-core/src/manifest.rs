//! Component descriptors and the build manifest.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, Result};
use crate::runtime::Runtime;

/// File name of the manifest inside the destination directory.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Processed style data attached by the style processor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleData {
    pub css: String,
    #[serde(default)]
    pub scoped: bool,
}

/// Structured description of one discovered component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    /// Custom element tag, e.g. `my-button`.
    pub tag_name: String,

    /// Name of the class carrying the component decorator.
    pub component_class: String,

    /// Path of the defining source file.
    pub component_path: String,

    #[serde(default)]
    pub shadow: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub style_urls: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<StyleData>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<String>,
}

impl ComponentDescriptor {
    pub fn new(
        tag_name: impl Into<String>,
        component_class: impl Into<String>,
        component_path: impl Into<String>,
    ) -> Self {
        Self {
            tag_name: tag_name.into(),
            component_class: component_class.into(),
            component_path: component_path.into(),
            ..Self::default()
        }
    }
}

/// Snapshot of every component found by one compile pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub components: Vec<ComponentDescriptor>,
}

impl Manifest {
    pub fn new(components: Vec<ComponentDescriptor>) -> Self {
        Self { components }
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write `manifest.json` under `dest_dir`, creating the directory.
    pub async fn write(&self, runtime: &dyn Runtime, dest_dir: &Path) -> Result<()> {
        let path = dest_dir.join(MANIFEST_FILE_NAME);
        let json = self.to_json()?;
        runtime
            .write_file_all(&path, json.as_bytes())
            .await
            .map_err(|source| CompileError::WriteFile { path, source })
    }
}
