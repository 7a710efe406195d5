//! In-memory representation of one source file.

use std::path::{Path, PathBuf};

use crate::error::{CompileError, Result};
use crate::manifest::ComponentDescriptor;

/// Marker whose presence makes a source file a transform candidate.
pub const COMPONENT_DECORATOR: &str = "@Component";

/// One source file plus the metadata derived from it during a build.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub file_name: String,
    pub file_path: PathBuf,
    pub src_text: String,
    src_text_without_decorators: String,
    pub is_source_file: bool,
    pub is_transformable: bool,
    component_meta: Option<ComponentDescriptor>,
}

impl FileRecord {
    /// Build a record from a path and its text, classifying it on the way.
    pub fn new(file_path: impl Into<PathBuf>, src_text: String) -> Self {
        let file_path = file_path.into();
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let is_source_file = is_source_file(&file_path);
        let is_transformable = is_source_file && is_transformable(&src_text);

        Self {
            file_name,
            file_path,
            src_text_without_decorators: src_text.clone(),
            src_text,
            is_source_file,
            is_transformable,
            component_meta: None,
        }
    }

    /// Source text with decorators stripped by the parser.
    ///
    /// Equal to `src_text` until a parser replaces it.
    pub fn src_text_without_decorators(&self) -> &str {
        &self.src_text_without_decorators
    }

    pub fn set_stripped_text(&mut self, text: impl Into<String>) {
        self.src_text_without_decorators = text.into();
    }

    pub fn component_meta(&self) -> Option<&ComponentDescriptor> {
        self.component_meta.as_ref()
    }

    /// Mutable access for collaborators that enrich an existing descriptor.
    pub fn component_meta_mut(&mut self) -> Option<&mut ComponentDescriptor> {
        self.component_meta.as_mut()
    }

    /// Attach component metadata. Only the first call per build succeeds.
    pub fn set_component_meta(&mut self, meta: ComponentDescriptor) -> Result<()> {
        if self.component_meta.is_some() {
            return Err(CompileError::MetadataAlreadySet(self.file_path.clone()));
        }
        self.component_meta = Some(meta);
        Ok(())
    }

    pub fn is_component(&self) -> bool {
        self.component_meta.is_some()
    }
}

/// TypeScript sources, excluding declaration files.
pub fn is_source_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.ends_with(".d.ts") {
        return false;
    }
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ts") | Some("tsx")
    )
}

/// Whether source text declares a component.
pub fn is_transformable(src_text: &str) -> bool {
    src_text.contains(COMPONENT_DECORATOR)
}
