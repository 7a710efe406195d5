//! Lazy chunk splitting.
//!
//! Each non-entry chunk of a render is written under its destination. Chunks
//! import the core entry through a placeholder, which is rewritten here to
//! the path from the chunk's own location; two destinations sharing a format
//! can sit at different depths and get different specifiers.

use std::path::{Path, PathBuf};

use facet_core::Runtime;

use super::shortcut::relative_import;
use crate::Result;
use crate::output::{validate_output_path, write_output};
use crate::render::RenderedOutput;

/// Placeholder the renderer emits where a chunk imports the core entry.
pub const CORE_PLACEHOLDER: &str = "__FACET_CORE__";

/// Write every lazy chunk of `rendered` under `dest`.
///
/// `core_entry` is the absolute path of the destination's core entry module.
pub async fn write_lazy_chunks(
    runtime: &dyn Runtime,
    dest: &Path,
    rendered: &RenderedOutput,
    core_entry: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for chunk in rendered.lazy_chunks() {
        let path = validate_output_path(dest, &chunk.file_name)?;
        let code = link_core(&chunk.code, &path, core_entry)?;
        write_output(runtime, &path, code.as_bytes()).await?;
        written.push(path);
    }

    tracing::debug!("Wrote {} lazy chunks to {}", written.len(), dest.display());
    Ok(written)
}

fn link_core(code: &str, chunk_path: &Path, core_entry: &Path) -> Result<String> {
    if !code.contains(CORE_PLACEHOLDER) {
        return Ok(code.to_string());
    }
    let specifier = relative_import(chunk_path, core_entry)?;
    Ok(code.replace(CORE_PLACEHOLDER, &specifier))
}
