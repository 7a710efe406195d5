//! Shortcut files: one-line re-exports of a target's real entry module.

use std::path::{Component, Path, PathBuf};

use facet_config::OutputTarget;
use facet_core::Runtime;
use futures::future::join_all;

use super::EmitOptions;
use crate::format::entry_file_name;
use crate::output::write_output;
use crate::{Error, Result};

/// Entry module the `index_file` shortcut points at.
pub const INDEX_ENTRY_NAME: &str = "index";

/// Import specifier that reaches `to` from a module located at `from_file`.
///
/// Always uses `/` separators and starts with `./` or `../`. Both paths must
/// be absolute or both relative.
pub fn relative_import(from_file: &Path, to: &Path) -> Result<String> {
    let from_dir = from_file.parent().unwrap_or(Path::new(""));
    if from_dir.is_absolute() != to.is_absolute() {
        return Err(Error::InvalidOutputPath(format!(
            "Cannot import '{}' from '{}': one path is absolute, the other relative",
            to.display(),
            from_file.display()
        )));
    }
    let relative = pathdiff::diff_paths(to, from_dir).ok_or_else(|| {
        Error::InvalidOutputPath(format!(
            "No relative path from '{}' to '{}'",
            from_dir.display(),
            to.display()
        ))
    })?;

    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let joined = parts.join("/");

    match relative.components().next() {
        Some(Component::ParentDir) => Ok(joined),
        _ => Ok(format!("./{}", joined)),
    }
}

/// Content of a shortcut file re-exporting `specifier`.
pub fn shortcut_source(specifier: &str) -> String {
    format!("export * from '{}';", specifier)
}

/// A shortcut file and the entry module it re-exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub file: PathBuf,
    pub entry: PathBuf,
}

/// Shortcuts declared by `target`.
///
/// Entries live in the legacy directory when legacy output is built for this
/// target, otherwise in the modern directory. Targets without a modern
/// directory declare none.
pub fn plan_shortcuts(target: &OutputTarget, options: &EmitOptions) -> Vec<Shortcut> {
    let Some(modern_dir) = &target.modern_dir else {
        return Vec::new();
    };
    let entry_dir = match &target.legacy_dir {
        Some(legacy_dir) if options.build_es5 => legacy_dir,
        _ => modern_dir,
    };

    let mut shortcuts = Vec::new();
    if let Some(loader) = &target.loader_file {
        shortcuts.push(Shortcut {
            file: loader.clone(),
            entry: entry_dir.join(entry_file_name(&options.namespace)),
        });
    }
    if let Some(index) = &target.index_file {
        shortcuts.push(Shortcut {
            file: index.clone(),
            entry: entry_dir.join(entry_file_name(INDEX_ENTRY_NAME)),
        });
    }
    shortcuts
}

/// Write every shortcut of every target concurrently.
///
/// All writes settle before the first error is returned.
pub async fn write_shortcuts(
    runtime: &dyn Runtime,
    targets: &[OutputTarget],
    options: &EmitOptions,
) -> Result<Vec<PathBuf>> {
    let shortcuts: Vec<Shortcut> = targets
        .iter()
        .flat_map(|target| plan_shortcuts(target, options))
        .collect();

    let writes = shortcuts.into_iter().map(|shortcut| async move {
        let specifier = relative_import(&shortcut.file, &shortcut.entry)?;
        write_output(
            runtime,
            &shortcut.file,
            shortcut_source(&specifier).as_bytes(),
        )
        .await?;
        Ok::<_, Error>(shortcut.file)
    });

    let mut written = Vec::new();
    let mut first_error = None;
    for result in join_all(writes).await {
        match result {
            Ok(path) => written.push(path),
            Err(e) => {
                tracing::error!("Failed to write shortcut: {}", e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(written),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(build_es5: bool) -> EmitOptions {
        EmitOptions {
            namespace: "app".into(),
            build_es5,
            is_dev: false,
            external_bundler: false,
        }
    }

    #[test]
    fn relative_import_into_child_dir() {
        let specifier = relative_import(
            Path::new("/www/app.js"),
            Path::new("/www/build/app/app.mjs.js"),
        )
        .unwrap();
        assert_eq!(specifier, "./build/app/app.mjs.js");
    }

    #[test]
    fn relative_import_into_sibling_dir() {
        let specifier = relative_import(
            Path::new("/dist/loader/index.js"),
            Path::new("/dist/esm/index.mjs.js"),
        )
        .unwrap();
        assert_eq!(specifier, "../esm/index.mjs.js");
    }

    #[test]
    fn relative_import_same_dir() {
        let specifier =
            relative_import(Path::new("/www/build/x.js"), Path::new("/www/build/app.mjs.js"))
                .unwrap();
        assert_eq!(specifier, "./app.mjs.js");
    }

    #[test]
    fn relative_import_between_relative_paths() {
        let specifier =
            relative_import(Path::new("loader/app.js"), Path::new("www/build/app.mjs.js"))
                .unwrap();
        assert_eq!(specifier, "../www/build/app.mjs.js");
    }

    #[test]
    fn relative_import_rejects_mixed_paths() {
        let err = relative_import(Path::new("loader/app.js"), Path::new("/www/build/app.mjs.js"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOutputPath(_)));

        let err = relative_import(Path::new("/www/app.js"), Path::new("build/app.mjs.js"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOutputPath(_)));
    }

    #[test]
    fn source_is_a_single_reexport() {
        assert_eq!(
            shortcut_source("./build/app.mjs.js"),
            "export * from './build/app.mjs.js';"
        );
    }

    #[test]
    fn legacy_dir_preferred_only_when_building_es5() {
        let target = OutputTarget::modern("/dist/esm")
            .with_legacy_dir("/dist/esm/es5")
            .with_loader_file("/dist/loader.js")
            .with_index_file("/dist/index.js");

        let modern = plan_shortcuts(&target, &options(false));
        assert_eq!(modern[0].entry, PathBuf::from("/dist/esm/app.mjs.js"));
        assert_eq!(modern[1].entry, PathBuf::from("/dist/esm/index.mjs.js"));

        let legacy = plan_shortcuts(&target, &options(true));
        assert_eq!(legacy[0].entry, PathBuf::from("/dist/esm/es5/app.mjs.js"));
        assert_eq!(legacy[1].entry, PathBuf::from("/dist/esm/es5/index.mjs.js"));
    }

    #[test]
    fn no_modern_dir_means_no_shortcuts() {
        let target = OutputTarget {
            legacy_dir: Some("/dist/es5".into()),
            loader_file: Some("/dist/loader.js".into()),
            ..OutputTarget::default()
        };
        assert!(plan_shortcuts(&target, &options(true)).is_empty());
    }
}
