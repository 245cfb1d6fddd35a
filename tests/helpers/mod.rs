#![allow(dead_code)]

use assert_cmd::Command;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Path to a file under `tests/fixtures/exports`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/exports")
        .join(name)
}

/// Copy fixtures into `$tmp/exports` and return that directory.
pub fn setup_export_dir(tmp: &TempDir, fixtures: &[&str]) -> PathBuf {
    let dir = tmp.path().join("exports");
    std::fs::create_dir_all(&dir).unwrap();
    for name in fixtures {
        std::fs::copy(fixture(name), dir.join(name)).unwrap();
    }
    dir
}

/// Zip the given fixtures (plus any extra entries) into `path`.
pub fn write_zip(path: &Path, fixtures: &[&str], extra: &[(&str, &str)]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    for name in fixtures {
        zip.start_file(*name, options).unwrap();
        zip.write_all(&std::fs::read(fixture(name)).unwrap()).unwrap();
    }
    for (name, content) in extra {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

/// Build a CLI command with HOME pointed at the temp directory, so no
/// user-level config leaks into the run.
#[allow(deprecated)]
pub fn cli_with_home(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("idea-miner").unwrap();
    cmd.env("HOME", tmp.path());
    cmd.env_remove("RUST_LOG");
    cmd
}
