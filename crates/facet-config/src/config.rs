//! Compiler configuration consumed by the build pipeline.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default namespace used to name the loader entry (`<namespace>.mjs.js`).
pub const DEFAULT_NAMESPACE: &str = "app";

/// Directory name whose subtrees are never walked.
pub const DEFAULT_DEPENDENCY_DIR: &str = "node_modules";

/// Default cap on concurrently open file handles during a walk.
pub const DEFAULT_MAX_OPEN_FILES: usize = 64;

/// One physical output variant.
///
/// Every field is optional. A target with neither `modern_dir` nor
/// `legacy_dir` produces nothing; shortcut files require `modern_dir`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputTarget {
    /// Destination for the modern (ES2017 module) build.
    pub modern_dir: Option<PathBuf>,

    /// Destination for the legacy (ES5) build. Only used when `build_es5` is on.
    pub legacy_dir: Option<PathBuf>,

    /// Shortcut file re-exporting `<namespace>.mjs.js`.
    pub loader_file: Option<PathBuf>,

    /// Shortcut file re-exporting `index.mjs.js`.
    pub index_file: Option<PathBuf>,
}

impl OutputTarget {
    /// Target with only a modern destination.
    pub fn modern(dir: impl Into<PathBuf>) -> Self {
        Self {
            modern_dir: Some(dir.into()),
            ..Self::default()
        }
    }

    pub fn with_legacy_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.legacy_dir = Some(dir.into());
        self
    }

    pub fn with_loader_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.loader_file = Some(file.into());
        self
    }

    pub fn with_index_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.index_file = Some(file.into());
        self
    }

    /// Whether this target declares any shortcut file.
    pub fn has_shortcuts(&self) -> bool {
        self.loader_file.is_some() || self.index_file.is_some()
    }

    fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        [
            &self.modern_dir,
            &self.legacy_dir,
            &self.loader_file,
            &self.index_file,
        ]
        .into_iter()
        .flatten()
    }

    /// Whether some of this target's paths are absolute and others relative.
    pub fn mixes_absolute_and_relative(&self) -> bool {
        let mut paths = self.paths();
        match paths.next() {
            Some(first) => paths.any(|p| p.is_absolute() != first.is_absolute()),
            None => false,
        }
    }

    fn resolve_paths(&mut self, root: &Path) {
        for path in [
            &mut self.modern_dir,
            &mut self.legacy_dir,
            &mut self.loader_file,
            &mut self.index_file,
        ]
        .into_iter()
        .flatten()
        {
            *path = absolutize(root, path);
        }
    }
}

/// Build configuration for one compiler run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Root of the source tree to walk.
    pub src_dir: PathBuf,

    /// Root of the build output; `manifest.json` lands here.
    pub dest_dir: PathBuf,

    /// Memoize file records for the duration of the run.
    pub cache_files: bool,

    /// Also produce the legacy (ES5) variant.
    pub build_es5: bool,

    /// Development mode: readable chunk names.
    pub is_dev: bool,

    /// Namespace used for the default loader entry name.
    pub fs_namespace: String,

    /// Directory name skipped during the walk.
    pub dependency_dir: String,

    /// Cap on concurrently open file handles during a walk.
    pub max_open_files: usize,

    /// Output is consumed by a host bundler that resolves dynamic imports itself.
    pub external_bundler: bool,

    pub output_targets: Vec<OutputTarget>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from("src"),
            dest_dir: PathBuf::from("www"),
            cache_files: true,
            build_es5: false,
            is_dev: false,
            fs_namespace: DEFAULT_NAMESPACE.to_string(),
            dependency_dir: DEFAULT_DEPENDENCY_DIR.to_string(),
            max_open_files: DEFAULT_MAX_OPEN_FILES,
            external_bundler: false,
            output_targets: Vec::new(),
        }
    }
}

impl CompilerConfig {
    pub fn new(src_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            src_dir: src_dir.into(),
            dest_dir: dest_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: OutputTarget) -> Self {
        self.output_targets.push(target);
        self
    }

    pub fn cache_files(mut self, enabled: bool) -> Self {
        self.cache_files = enabled;
        self
    }

    pub fn build_es5(mut self, enabled: bool) -> Self {
        self.build_es5 = enabled;
        self
    }

    pub fn is_dev(mut self, enabled: bool) -> Self {
        self.is_dev = enabled;
        self
    }

    pub fn fs_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.fs_namespace = namespace.into();
        self
    }

    /// Path of the manifest written at the end of a successful compile.
    pub fn manifest_path(&self) -> PathBuf {
        self.dest_dir.join("manifest.json")
    }

    /// Make every relative path absolute against `root` and clean it.
    pub fn resolve_paths(mut self, root: &Path) -> Self {
        self.src_dir = absolutize(root, &self.src_dir);
        self.dest_dir = absolutize(root, &self.dest_dir);
        for target in &mut self.output_targets {
            target.resolve_paths(root);
        }
        self
    }

    /// Validate the configuration once, before any work starts.
    pub fn validate(&self) -> Result<()> {
        if self.src_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid("src_dir", "source directory cannot be empty"));
        }
        if self.dest_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid(
                "dest_dir",
                "destination directory cannot be empty",
            ));
        }
        if self.src_dir.clean() == self.dest_dir.clean() {
            return Err(ConfigError::invalid(
                "dest_dir",
                "destination directory must differ from the source directory",
            ));
        }

        let namespace = self.fs_namespace.trim();
        if namespace.is_empty() || namespace.contains(['/', '\\']) {
            return Err(ConfigError::invalid(
                "fs_namespace",
                format!(
                    "'{}' must be a non-empty name without path separators",
                    self.fs_namespace
                ),
            ));
        }

        if self.dependency_dir.is_empty() {
            return Err(ConfigError::invalid(
                "dependency_dir",
                "dependency directory name cannot be empty",
            ));
        }

        if self.max_open_files == 0 {
            return Err(ConfigError::invalid(
                "max_open_files",
                "at least one open file handle is required",
            ));
        }

        for (index, target) in self.output_targets.iter().enumerate() {
            if target.has_shortcuts() && target.modern_dir.is_none() {
                return Err(ConfigError::InvalidTarget {
                    index,
                    message: "loader_file and index_file require modern_dir".to_string(),
                });
            }
            if target.mixes_absolute_and_relative() {
                return Err(ConfigError::InvalidTarget {
                    index,
                    message: "paths must be all absolute or all relative".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn absolutize(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.clean()
    } else {
        root.join(path).clean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_documented_values() {
        let config = CompilerConfig::default();
        assert!(config.cache_files);
        assert!(!config.build_es5);
        assert!(!config.is_dev);
        assert_eq!(config.fs_namespace, "app");
        assert_eq!(config.dependency_dir, "node_modules");
        assert_eq!(config.max_open_files, 64);
        assert!(config.output_targets.is_empty());
    }

    #[test]
    fn resolve_paths_makes_targets_absolute() {
        let config = CompilerConfig::new("src", "www")
            .with_target(OutputTarget::modern("dist/esm").with_loader_file("loader/index.js"))
            .resolve_paths(Path::new("/project"));

        assert_eq!(config.src_dir, PathBuf::from("/project/src"));
        let target = &config.output_targets[0];
        assert_eq!(target.modern_dir, Some(PathBuf::from("/project/dist/esm")));
        assert_eq!(
            target.loader_file,
            Some(PathBuf::from("/project/loader/index.js"))
        );
        assert_eq!(target.legacy_dir, None);
    }

    #[test]
    fn shortcut_without_modern_dir_is_rejected() {
        let target = OutputTarget {
            legacy_dir: Some("dist/es5".into()),
            loader_file: Some("loader.js".into()),
            ..OutputTarget::default()
        };
        let config = CompilerConfig::new("src", "www").with_target(target);

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTarget { index: 0, .. }));
    }

    #[test]
    fn target_mixing_absolute_and_relative_paths_is_rejected() {
        let config = CompilerConfig::new("src", "www")
            .with_target(OutputTarget::modern("/p/www/build"))
            .with_target(OutputTarget::modern("/p/www/build").with_loader_file("www/app.js"));

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTarget { index: 1, .. }));

        let resolved = config.resolve_paths(Path::new("/p"));
        assert!(resolved.validate().is_ok());
    }

    #[test]
    fn namespace_with_separator_is_rejected() {
        let config = CompilerConfig::new("src", "www").fs_namespace("a/b");
        assert!(config.validate().is_err());
    }

    #[test]
    fn same_src_and_dest_is_rejected() {
        let config = CompilerConfig::new("src", "./src");
        assert!(config.validate().is_err());
    }
}
