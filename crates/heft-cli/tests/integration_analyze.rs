//! End-to-end tests for the `heft` binary.
//!
//! Each test runs the real binary in its own temporary directory, so config
//! discovery and relative report paths never leak between tests.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn heft(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("heft").unwrap();
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("HEFT_BUNDLE_NAME")
        .env_remove("HEFT_DRY_RUN")
        .env("NO_COLOR", "1");
    cmd
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_normalize_prints_one_key_per_line() {
    let temp = TempDir::new().unwrap();

    heft(temp.path())
        .args(["normalize", "app.abcd1234.js", "main.js"])
        .assert()
        .success()
        .stdout("app.*.js\nmain.js\n");
}

#[test]
fn test_normalize_with_template() {
    let temp = TempDir::new().unwrap();

    heft(temp.path())
        .args(["normalize", "-t", "[name]-[hash].js", "my-lib-9f8e.js"])
        .assert()
        .success()
        .stdout("my-lib-*.js\n");
}

#[test]
fn test_normalize_requires_filenames() {
    let temp = TempDir::new().unwrap();

    heft(temp.path()).arg("normalize").assert().failure();
}

#[test]
fn test_analyze_dry_run_emits_per_compilation() {
    let temp = TempDir::new().unwrap();
    let out_dir = temp.path().join("dist");

    heft(temp.path())
        .arg("analyze")
        .arg(fixture("stats.json"))
        .args(["--bundle-name", "web", "--dry-run", "--out-dir"])
        .arg(&out_dir)
        .assert()
        .success();

    let client = read_json(&out_dir.join("web-client-stats.json"));
    let server = read_json(&out_dir.join("web-server-stats.json"));

    assert_eq!(client["bundleName"], "web-client");
    assert_eq!(client["bundler"]["name"], "rspack");
    assert_eq!(client["chunks"][0]["uniqueId"], "0-0");
    assert_eq!(client["chunks"][0]["dynamicImports"][0], "lazy.8e7d6c5b.js");
    assert_eq!(server["bundleName"], "web-server");
    assert_eq!(server["plugin"]["name"], "heft");

    // Dry run never persists.
    assert!(!temp.path().join(".heft").exists());
}

#[test]
fn test_analyze_chunk_format_flag_decorates_name() {
    let temp = TempDir::new().unwrap();
    let out_dir = temp.path().join("dist");

    heft(temp.path())
        .arg("analyze")
        .arg(fixture("stats.json"))
        .args(["-n", "web", "--dry-run", "--chunk-format", "module", "-o"])
        .arg(&out_dir)
        .assert()
        .success();

    assert!(out_dir.join("web-client-esm-stats.json").is_file());
    assert!(out_dir.join("web-server-esm-stats.json").is_file());
}

#[test]
fn test_analyze_persists_reports() {
    let temp = TempDir::new().unwrap();
    let out_dir = temp.path().join("dist");
    let reports = temp.path().join("reports");

    heft(temp.path())
        .arg("analyze")
        .arg(fixture("stats.json"))
        .args(["-n", "web", "-o"])
        .arg(&out_dir)
        .arg("--report-dir")
        .arg(&reports)
        .assert()
        .success();

    let client = read_json(&reports.join("web-client-stats.json"));
    assert_eq!(client["modules"][2]["name"], "./src/shared.js");
    assert_eq!(client["modules"][2]["size"], 0);
    assert!(reports.join("web-server-stats.json").is_file());

    // Nothing is emitted next to the build output outside dry run.
    assert!(!out_dir.join("web-client-stats.json").exists());
}

#[test]
fn test_analyze_reports_gzip_size_of_emitted_assets() {
    let temp = TempDir::new().unwrap();
    let out_dir = temp.path().join("dist");
    fs::create_dir_all(&out_dir).unwrap();
    fs::write(
        out_dir.join("main.3f9a1c2b.js"),
        "console.log('hello');\n".repeat(100),
    )
    .unwrap();

    heft(temp.path())
        .arg("analyze")
        .arg(fixture("stats.json"))
        .args(["-n", "web", "--dry-run", "-o"])
        .arg(&out_dir)
        .assert()
        .success();

    let client = read_json(&out_dir.join("web-client-stats.json"));
    let gzip = client["assets"][0]["gzipSize"].as_u64().unwrap();
    assert!(gzip > 0 && gzip < 2_200);
    // Not on disk, so no gzip size.
    assert!(client["assets"][2]["gzipSize"].is_null());
}

#[test]
fn test_analyze_reads_bundle_name_from_config() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("heft.config.json"),
        r#"{ "bundleName": "from-config", "reportDir": "out" }"#,
    )
    .unwrap();

    heft(temp.path())
        .arg("analyze")
        .arg(fixture("stats.json"))
        .args(["-o", "dist"])
        .assert()
        .success();

    assert!(temp.path().join("out/from-config-client-stats.json").is_file());
    assert!(temp.path().join("out/from-config-server-stats.json").is_file());
}

#[test]
fn test_analyze_missing_stats_file_fails() {
    let temp = TempDir::new().unwrap();

    heft(temp.path())
        .args(["analyze", "does-not-exist.json", "-n", "web"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.json"));
}

#[test]
fn test_analyze_without_bundle_name_fails() {
    let temp = TempDir::new().unwrap();

    heft(temp.path())
        .arg("analyze")
        .arg(fixture("stats.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("bundleName"));
}

#[test]
fn test_analyze_disabled_is_a_no_op() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("heft.config.json"),
        r#"{ "enableBundleAnalysis": false }"#,
    )
    .unwrap();

    heft(temp.path())
        .arg("analyze")
        .arg(fixture("stats.json"))
        .assert()
        .success();

    assert!(!temp.path().join(".heft").exists());
}

#[test]
fn test_check_valid_config() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("heft.config.toml"),
        "bundleName = \"my-app\"\n",
    )
    .unwrap();

    heft(temp.path())
        .arg("check")
        .assert()
        .success()
        .stderr(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_check_invalid_bundle_name() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("heft.config.json"),
        r#"{ "bundleName": "has spaces!" }"#,
    )
    .unwrap();

    heft(temp.path()).arg("check").assert().failure();
}
