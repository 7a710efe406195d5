//! Validated file writes for emitted output.
//!
//! Every rendered file name is joined onto its destination and checked to
//! stay inside it before anything touches the filesystem. Writes go through
//! the [`Runtime`] so tests can run against memory.
//!
//! There is no rollback: a failure leaves earlier files in place.

use std::path::{Path, PathBuf};

use facet_core::Runtime;
use path_clean::PathClean;

use crate::{Error, Result};

/// Resolve `filename` under `base_dir`, rejecting anything that escapes it.
///
/// Rejects:
/// - `../x.js` and `a/../../x.js` style traversal
/// - absolute file names outside the base
/// - NUL bytes
pub fn validate_output_path(base_dir: &Path, filename: &str) -> Result<PathBuf> {
    if filename.contains('\0') {
        return Err(Error::InvalidOutputPath(
            "Filename contains null byte".to_string(),
        ));
    }

    #[cfg(target_os = "windows")]
    {
        let upper = filename.to_uppercase();
        let device_names = [
            "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
            "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
        ];
        for device in &device_names {
            if upper == *device || upper.starts_with(&format!("{}.", device)) {
                return Err(Error::InvalidOutputPath(format!(
                    "Filename is a reserved device name: {}",
                    filename
                )));
            }
        }
    }

    let base_dir = base_dir.clean();
    let full_path = base_dir.join(Path::new(filename).clean()).clean();

    if full_path == base_dir || !full_path.starts_with(&base_dir) {
        return Err(Error::InvalidOutputPath(format!(
            "Path '{}' escapes output directory '{}' (resolved to '{}')",
            filename,
            base_dir.display(),
            full_path.display()
        )));
    }

    Ok(full_path)
}

/// Write `content` to `path`, creating parent directories.
pub async fn write_output(runtime: &dyn Runtime, path: &Path, content: &[u8]) -> Result<()> {
    runtime
        .write_file_all(path, content)
        .await
        .map_err(|source| Error::WriteFailure {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!("Wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_core::test_utils::MemoryRuntime;

    #[test]
    fn test_validate_output_path_normal() {
        let result = validate_output_path(Path::new("/tmp/output"), "app.mjs.js");
        assert_eq!(result.unwrap(), Path::new("/tmp/output/app.mjs.js"));
    }

    #[test]
    fn test_validate_output_path_nested() {
        let result = validate_output_path(Path::new("/tmp/output"), "chunks/a1b2.js");
        assert_eq!(result.unwrap(), Path::new("/tmp/output/chunks/a1b2.js"));
    }

    #[test]
    fn test_validate_output_path_traversal() {
        let base = Path::new("/tmp/output");
        assert!(matches!(
            validate_output_path(base, "../etc/passwd"),
            Err(Error::InvalidOutputPath(_))
        ));
        assert!(validate_output_path(base, "safe/../../../../etc/passwd").is_err());
        assert!(validate_output_path(base, "/etc/passwd").is_err());
        assert!(validate_output_path(base, ".").is_err());
    }

    #[test]
    fn test_validate_output_path_null_byte() {
        assert!(validate_output_path(Path::new("/tmp/output"), "file\0name.js").is_err());
    }

    #[test]
    fn test_validate_output_path_current_dir() {
        let result = validate_output_path(Path::new("/tmp/output/"), "./index.mjs.js");
        assert_eq!(result.unwrap(), Path::new("/tmp/output/index.mjs.js"));
    }

    #[tokio::test]
    async fn write_output_creates_parents() {
        let runtime = MemoryRuntime::new("/");
        write_output(&runtime, Path::new("/www/build/app.mjs.js"), b"export {};")
            .await
            .unwrap();

        assert_eq!(
            runtime.contents("/www/build/app.mjs.js").as_deref(),
            Some("export {};")
        );
    }
}
