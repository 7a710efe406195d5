//! File-based config discovery
//!
//! Finds a Facet configuration next to a project and layers it with defaults
//! and environment overrides.

use std::fs;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use serde_json::Value;

use crate::config::CompilerConfig;
use crate::error::{ConfigError, Result};

/// Name of the TOML config file.
pub const CONFIG_FILE: &str = "facet.toml";

/// Key holding the config object inside `package.json`.
pub const PACKAGE_JSON_KEY: &str = "facet";

/// Prefix of environment variable overrides (`FACET_IS_DEV=true`).
pub const ENV_PREFIX: &str = "FACET_";

/// Where a configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Toml(PathBuf),
    PackageJson(PathBuf),
}

/// Searches a project root for Facet configuration.
///
/// # Example
///
/// ```no_run
/// use facet_config::ConfigDiscovery;
///
/// let config = ConfigDiscovery::new(".").load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory.
    ///
    /// Searches `facet.toml` first, then a non-null `facet` field in `package.json`.
    pub fn find(&self) -> Option<ConfigSource> {
        let toml_path = self.root.join(CONFIG_FILE);
        if toml_path.is_file() {
            return Some(ConfigSource::Toml(toml_path));
        }

        let pkg_path = self.root.join("package.json");
        let content = fs::read_to_string(&pkg_path).ok()?;
        let parsed: Value = serde_json::from_str(&content).ok()?;
        match parsed.get(PACKAGE_JSON_KEY) {
            Some(value) if !value.is_null() => Some(ConfigSource::PackageJson(pkg_path)),
            _ => None,
        }
    }

    /// Load defaults, the discovered file and `FACET_` environment overrides,
    /// then resolve every path against the root.
    ///
    /// A missing config file is not an error; defaults apply.
    pub fn load(&self) -> Result<CompilerConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(CompilerConfig::default()));

        match self.find() {
            Some(ConfigSource::Toml(path)) => {
                tracing::debug!("Loading config from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            Some(ConfigSource::PackageJson(path)) => {
                tracing::debug!("Loading config from {}", path.display());
                figment = figment.merge(Serialized::defaults(package_json_config(&path)?));
            }
            None => {
                tracing::debug!("No config found in {}, using defaults", self.root.display());
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        let config: CompilerConfig = figment.extract()?;
        Ok(config.resolve_paths(&self.root))
    }

    /// Like [`load`](Self::load) but fails when no config file exists.
    pub fn load_required(&self) -> Result<CompilerConfig> {
        if self.find().is_none() {
            return Err(ConfigError::NotFound(self.root.clone()));
        }
        self.load()
    }
}

impl CompilerConfig {
    /// Shorthand for `ConfigDiscovery::new(root).load()`.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        ConfigDiscovery::new(root).load()
    }
}

fn package_json_config(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    let mut parsed: Value = serde_json::from_str(&content).map_err(|e| {
        ConfigError::invalid("package.json", format!("invalid JSON: {e}"))
    })?;

    match parsed.get_mut(PACKAGE_JSON_KEY).map(Value::take) {
        Some(value) if value.is_object() => Ok(value),
        _ => Err(ConfigError::invalid(
            PACKAGE_JSON_KEY,
            "the 'facet' field in package.json must be an object",
        )),
    }
}

/// Discover and load config from the current directory.
pub fn discover() -> Result<CompilerConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(root).load()
}
