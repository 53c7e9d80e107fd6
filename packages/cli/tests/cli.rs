//! End-to-end tests for the `parcp` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn parcp(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_parcp"))
        .arg("-q")
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("PARCP_CONFIG")
        .output()
        .unwrap()
}

#[cfg(unix)]
#[test]
fn test_copies_tree_and_exits_zero() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::create_dir_all(a.join("sub")).unwrap();
    fs::write(a.join("f.txt"), "hi").unwrap();
    fs::write(a.join("sub/g.txt"), "bye").unwrap();
    std::os::unix::fs::symlink("../f.txt", a.join("link")).unwrap();

    let output = parcp(&[&a, &b]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(fs::read_to_string(b.join("f.txt")).unwrap(), "hi");
    assert_eq!(fs::read_to_string(b.join("sub/g.txt")).unwrap(), "bye");
    assert_eq!(fs::read_link(b.join("link")).unwrap(), Path::new("../f.txt"));
}

#[cfg(unix)]
#[test]
fn test_missing_source_exits_nonzero() {
    let dir = TempDir::new().unwrap();

    let output = parcp(&[&dir.path().join("missing"), &dir.path().join("b")]);

    assert_eq!(output.status.code(), Some(255));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not a directory"));
}

#[cfg(unix)]
#[test]
fn test_destination_inside_source_rejected() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a");
    fs::create_dir_all(&a).unwrap();

    let output = parcp(&[&a, &a.join("copy")]);

    assert_eq!(output.status.code(), Some(255));
    assert!(!a.join("copy").exists());
}

#[test]
fn test_help_exits_zero() {
    let output = Command::new(env!("CARGO_BIN_EXE_parcp"))
        .arg("--help")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--jobs"));
}

#[test]
fn test_debug_log_reports_resolved_settings() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a");
    let settings = dir.path().join("parcp.toml");
    fs::create_dir_all(&a).unwrap();
    fs::write(a.join("f.txt"), "hi").unwrap();
    fs::write(&settings, "buffer_size = 4096\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_parcp"))
        .args(["-l", "DEBUG"])
        .arg(&a)
        .arg(dir.path().join("b"))
        .env_remove("RUST_LOG")
        .env("PARCP_CONFIG", &settings)
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(0));
    assert!(stderr.contains("Settings loaded from"), "{stderr}");
    assert!(stderr.contains("4096 byte chunks"), "{stderr}");
}

#[cfg(unix)]
#[test]
fn test_skip_warning_carries_unit_label() {
    use std::os::unix::net::UnixListener;

    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::create_dir_all(a.join("sub")).unwrap();
    fs::write(a.join("sub/g.txt"), "bye").unwrap();
    let _socket = UnixListener::bind(a.join("sub/sock")).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_parcp"))
        .args(["-l", "WARN"])
        .arg(&a)
        .arg(&b)
        .env_remove("RUST_LOG")
        .env_remove("PARCP_CONFIG")
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(0));
    assert!(stderr.contains("[sub] Skipping"), "{stderr}");
    assert!(b.join("sub/g.txt").is_file());
    assert!(fs::symlink_metadata(b.join("sub/sock")).is_err());
}

#[test]
fn test_pool_logs_each_join() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a");
    fs::create_dir_all(a.join("one")).unwrap();
    fs::create_dir_all(a.join("two")).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_parcp"))
        .args(["-l", "DEBUG", "-j2"])
        .arg(&a)
        .arg(dir.path().join("b"))
        .env_remove("RUST_LOG")
        .env_remove("PARCP_CONFIG")
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stderr.matches("Joined unit").count(), 2, "{stderr}");
}
