// Keepsake backup utility.
// Copyright 2026 Keepsake contributors.

// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

//! Run keepsake CLI as a subprocess and test it.

use assert_cmd::Command;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use indoc::indoc;
use predicates::prelude::*;


fn run_keepsake() -> Command {
    Command::cargo_bin("keepsake").expect("locate keepsake binary")
}

/// A `src` tree with two files, in a temporary directory.
fn source_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    dir.child("src/hello").write_str("hello world").unwrap();
    dir.child("src/subdir/subfile").write_str("contents").unwrap();
    dir
}

#[test]
fn no_args() {
    run_keepsake()
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn help() {
    run_keepsake()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "A utility to create, verify, and restore backups locally",
        ))
        .stdout(predicate::str::contains("backup"))
        .stdout(predicate::str::contains("restore"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn version() {
    run_keepsake()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "keepsake {}",
            keepsake::VERSION
        )));
}

#[test]
fn json_log_records_events() {
    let source = source_tree();
    let dest = TempDir::new().unwrap();
    let log = TempDir::new().unwrap();
    let log_path = log.child("log.json");

    run_keepsake()
        .arg("backup")
        .arg(source.child("src").path())
        .arg(dest.path())
        .arg("--log-json")
        .arg(log_path.path())
        .assert()
        .success();

    log_path.assert(predicate::str::contains("Backup created at"));
    log_path.assert(predicate::str::starts_with("{"));
}

#[test]
fn debug_flag_shows_trace() {
    let source = source_tree();
    let dest = TempDir::new().unwrap();

    run_keepsake()
        .args(["-D", "backup"])
        .arg(source.child("src").path())
        .arg(dest.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("TRACE"));
}
