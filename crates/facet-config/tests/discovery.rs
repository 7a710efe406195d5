use std::fs;

use facet_config::{ConfigDiscovery, ConfigError, OutputTarget};
use tempfile::TempDir;

#[test]
fn load_without_config_uses_defaults_resolved_against_root() {
    let dir = TempDir::new().unwrap();
    let config = ConfigDiscovery::new(dir.path()).load().unwrap();

    assert_eq!(config.src_dir, dir.path().join("src"));
    assert_eq!(config.dest_dir, dir.path().join("www"));
    assert!(config.cache_files);
    assert_eq!(config.fs_namespace, "app");
}

#[test]
fn load_parses_toml_targets() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("facet.toml"),
        r#"
src_dir = "components"
dest_dir = "build"
build_es5 = true
fs_namespace = "mylib"

[[output_targets]]
modern_dir = "dist/esm/es2017"
legacy_dir = "dist/esm/es5"
loader_file = "loader/index.mjs"
"#,
    )
    .unwrap();

    let config = ConfigDiscovery::new(dir.path()).load().unwrap();
    assert_eq!(config.src_dir, dir.path().join("components"));
    assert!(config.build_es5);
    assert_eq!(config.fs_namespace, "mylib");
    assert_eq!(
        config.output_targets,
        vec![
            OutputTarget::modern(dir.path().join("dist/esm/es2017"))
                .with_legacy_dir(dir.path().join("dist/esm/es5"))
                .with_loader_file(dir.path().join("loader/index.mjs"))
        ]
    );
    config.validate().unwrap();
}

#[test]
fn load_reads_package_json_field() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{
            "name": "components",
            "facet": { "is_dev": true, "dest_dir": "out" }
        }"#,
    )
    .unwrap();

    let config = ConfigDiscovery::new(dir.path()).load().unwrap();
    assert!(config.is_dev);
    assert_eq!(config.dest_dir, dir.path().join("out"));
}

#[test]
fn load_rejects_unknown_target_fields() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("facet.toml"),
        r#"
[[output_targets]]
modern_dir = "dist"
esm_dir = "typo"
"#,
    )
    .unwrap();

    let err = ConfigDiscovery::new(dir.path()).load().unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}

#[test]
fn invalid_toml_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("facet.toml"), "src_dir = [").unwrap();

    let result = ConfigDiscovery::new(dir.path()).load();
    assert!(result.is_err());
}
