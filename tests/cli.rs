//! Exit status and config merging of the two executables

use nearby_places::{PlaceRecord, ResultSet};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

/// Run a binary inside `dir`, with home and config dirs pointed there too
/// so no user-level config file is picked up.
fn run(bin: &str, dir: &Path, args: &[&str]) -> Output {
    Command::new(bin)
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn export_bin(dir: &Path, args: &[&str]) -> Output {
    run(env!("CARGO_BIN_EXE_places-export"), dir, args)
}

fn collect_bin(dir: &Path, args: &[&str]) -> Output {
    run(env!("CARGO_BIN_EXE_places-collect"), dir, args)
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_sample(dir: &Path, name: &str) {
    ResultSet::new(vec![
        PlaceRecord::new("p1", "Pizza A", (40.7130, -74.0055)),
        PlaceRecord::new("p2", "Cafe B", (40.7125, -74.0070)),
    ])
    .write_to(&dir.join(name))
    .unwrap();
}

#[test]
fn test_export_empty_directory_fails() {
    let dir = tempdir().unwrap();

    let output = export_bin(dir.path(), &[]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("No JSON files found"),
        "stderr: {}",
        stderr(&output)
    );
    assert!(!dir.path().join("combined_data.xlsx").exists());
}

#[test]
fn test_export_malformed_config_fails() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("nearby-places.toml"),
        "[export]\noutput = \"custom.xlsx\"\nsource_column = \"nope\"\n",
    )
    .unwrap();
    write_sample(dir.path(), "a.json");

    let output = export_bin(dir.path(), &[]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("Failed to load config"), "stderr: {}", err);
    assert!(err.contains("nearby-places.toml"), "stderr: {}", err);
    assert!(!dir.path().join("combined_data.xlsx").exists());
    assert!(!dir.path().join("custom.xlsx").exists());
}

#[test]
fn test_export_uses_config_then_flags() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("nearby-places.toml"),
        "[export]\noutput = \"custom.xlsx\"\n",
    )
    .unwrap();
    write_sample(dir.path(), "a.json");

    let output = export_bin(dir.path(), &[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(dir.path().join("custom.xlsx").exists());
    assert!(!dir.path().join("combined_data.xlsx").exists());

    let output = export_bin(dir.path(), &["-o", "flag.xlsx"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(dir.path().join("flag.xlsx").exists());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total rows: 2"), "stdout: {}", stdout);
}

#[test]
fn test_export_invalid_file_fails() {
    let dir = tempdir().unwrap();
    write_sample(dir.path(), "a.json");
    fs::write(dir.path().join("b.json"), "{ not json").unwrap();

    let output = export_bin(dir.path(), &[]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("b.json"), "stderr: {}", stderr(&output));
    assert!(!dir.path().join("combined_data.xlsx").exists());
}

#[test]
fn test_collect_malformed_config_fails() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("nearby-places.toml"),
        "[collect]\nlatitude = \"north\"\n",
    )
    .unwrap();

    let output = collect_bin(dir.path(), &[]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("Failed to load config"),
        "stderr: {}",
        stderr(&output)
    );
    assert!(!dir.path().join("nearby_places.json").exists());
}

#[test]
fn test_collect_missing_key_file_fails() {
    let dir = tempdir().unwrap();

    let output = collect_bin(dir.path(), &["--base-url", "http://127.0.0.1:9"]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("Failed to load API key"),
        "stderr: {}",
        stderr(&output)
    );
    assert!(!dir.path().join("nearby_places.json").exists());
}
