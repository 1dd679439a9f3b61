//! Tests for applying CLI overrides to the loaded config.

use super::parse;
use eprb_core::config::EprbConfig;
use std::path::PathBuf;

#[test]
fn no_flags_keep_config() {
    let cli = parse(&["eprb", "-v", "8.11.1"]);
    let mut cfg = EprbConfig::default();
    cli.apply_overrides(&mut cfg);
    assert_eq!(cfg, EprbConfig::default());
}

#[test]
fn flags_replace_config_values() {
    let cli = parse(&[
        "eprb",
        "-v",
        "8.11.1",
        "--registry",
        "http://mirror:8080",
        "--builds-dir",
        "out",
        "--jobs",
        "2",
    ]);
    let mut cfg = EprbConfig::default();
    cli.apply_overrides(&mut cfg);
    assert_eq!(cfg.registry_url, "http://mirror:8080");
    assert_eq!(cfg.builds_dir, PathBuf::from("out"));
    assert_eq!(cfg.max_concurrent_downloads, 2);
    assert!(cfg.retry.is_none());
}
