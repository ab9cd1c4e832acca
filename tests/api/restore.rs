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

//! Restoring backups through the API.

use std::fs;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

use keepsake::test_fixtures::{ScratchBackup, ScriptedDecisions, TreeFixture};
use keepsake::*;

use crate::dir_names;

#[test]
fn restore_reproduces_the_source() {
    let backup = ScratchBackup::new(false);
    let dest = TreeFixture::new();

    let outcome = restore(backup.archive(), dest.path(), &mut ScriptedDecisions::new()).unwrap();

    let restored = dest.path().join("src_restored");
    assert_eq!(
        outcome,
        RestoreOutcome::Restored {
            path: restored.clone(),
            overwritten: false,
        }
    );
    dir_assert::assert_paths(restored.join("src"), backup.source.path().join("src")).unwrap();
}

#[test]
fn uncompressed_archive_restores_too() {
    let source = TreeFixture::new();
    source.create_dir("docs");
    source.create_file_with_contents("docs/a", b"alpha");
    let backups = TreeFixture::new();
    let mut request = BackupRequest::new(source.path().join("docs"), backups.path());
    request.compression = CompressionLevel::NONE;
    let made = create_backup(&request).unwrap();
    let dest = TreeFixture::new();

    restore(&made.archive, dest.path(), &mut ScriptedDecisions::new()).unwrap();

    assert_eq!(
        fs::read(dest.path().join("docs_restored/docs/a")).unwrap(),
        b"alpha"
    );
}

#[test]
fn overwrite_replaces_files_in_existing_directory() {
    let backup = ScratchBackup::new(false);
    let dest = TreeFixture::new();
    dest.create_dir("src_restored");
    dest.create_dir("src_restored/src");
    dest.create_file_with_contents("src_restored/src/hello", b"stale");
    dest.create_file("src_restored/extra");
    let mut decisions = ScriptedDecisions::new().conflict(ConflictChoice::Overwrite);

    let outcome = restore(backup.archive(), dest.path(), &mut decisions).unwrap();

    assert_eq!(
        outcome,
        RestoreOutcome::Restored {
            path: dest.path().join("src_restored"),
            overwritten: true,
        }
    );
    assert_eq!(
        fs::read(dest.path().join("src_restored/src/hello")).unwrap(),
        b"hello world"
    );
    assert!(dest.path().join("src_restored/extra").is_file());
    assert!(decisions.is_finished());
}

#[test]
fn new_name_leaves_existing_directory_alone() {
    let backup = ScratchBackup::new(false);
    let dest = TreeFixture::new();
    dest.create_dir("src_restored");
    dest.create_file_with_contents("src_restored/mine", b"keep me");
    let mut decisions = ScriptedDecisions::new()
        .conflict(ConflictChoice::New)
        .name("y");

    let outcome = restore(backup.archive(), dest.path(), &mut decisions).unwrap();

    assert_eq!(
        outcome,
        RestoreOutcome::Restored {
            path: dest.path().join("y_restored"),
            overwritten: false,
        }
    );
    assert_eq!(dir_names(dest.path()), ["src_restored", "y_restored"]);
    assert_eq!(dir_names(&dest.path().join("src_restored")), ["mine"]);
    assert!(dest.path().join("y_restored/src/subdir/subfile").is_file());
}

#[test]
fn new_name_that_is_also_taken_is_asked_again() {
    let backup = ScratchBackup::new(false);
    let dest = TreeFixture::new();
    dest.create_dir("src_restored");
    dest.create_dir("y_restored");
    let mut decisions = ScriptedDecisions::new()
        .conflict(ConflictChoice::New)
        .name("y")
        .name("z");

    let outcome = restore(backup.archive(), dest.path(), &mut decisions).unwrap();

    assert_matches!(outcome, RestoreOutcome::Restored { path, .. } if path == dest.path().join("z_restored"));
    assert!(decisions.is_finished());
    assert!(dir_names(&dest.path().join("y_restored")).is_empty());
}

#[test]
fn exit_changes_nothing() {
    let backup = ScratchBackup::new(false);
    let dest = TreeFixture::new();
    dest.create_dir("src_restored");

    let outcome = restore(
        backup.archive(),
        dest.path(),
        &mut ScriptedDecisions::new().conflict(ConflictChoice::Exit),
    )
    .unwrap();

    assert_eq!(
        outcome,
        RestoreOutcome::Declined {
            existing: dest.path().join("src_restored"),
        }
    );
    assert_eq!(dir_names(dest.path()), ["src_restored"]);
    assert!(dir_names(&dest.path().join("src_restored")).is_empty());
}

#[test]
fn verified_archive_is_restored() {
    let backup = ScratchBackup::new(true);
    let dest = TreeFixture::new();
    let mut decisions = ScriptedDecisions::new().yes_no(true);

    let outcome = restore(backup.archive(), dest.path(), &mut decisions).unwrap();

    assert_matches!(outcome, RestoreOutcome::Restored { .. });
    assert_eq!(decisions.asked().len(), 1);
    assert!(decisions.asked()[0].contains("Verify before restoring"));
}

#[test]
fn declining_verification_still_restores() {
    let backup = ScratchBackup::new(true);
    // Never read, since verification is declined.
    fs::write(backup.made.checksum.as_ref().unwrap(), "garbage\n").unwrap();
    let dest = TreeFixture::new();
    let mut decisions = ScriptedDecisions::new().yes_no(false);

    let outcome = restore(backup.archive(), dest.path(), &mut decisions).unwrap();

    assert_matches!(outcome, RestoreOutcome::Restored { .. });
    assert_eq!(decisions.asked().len(), 1);
    assert!(dest.path().join("src_restored/src/hello").is_file());
}

#[traced_test]
#[test]
fn tampered_archive_aborts_when_caller_refuses() {
    let backup = ScratchBackup::new(true);
    backup.damage_archive();
    assert!(!verify(backup.made.checksum.as_ref().unwrap()));
    let dest = TreeFixture::new();
    let mut decisions = ScriptedDecisions::new().yes_no(true).yes_no(false);

    let outcome = restore(backup.archive(), dest.path(), &mut decisions).unwrap();

    assert_eq!(
        outcome,
        RestoreOutcome::Aborted {
            archive: backup.archive().to_owned(),
        }
    );
    assert!(decisions.is_finished());
    assert!(dir_names(dest.path()).is_empty());
    assert!(logs_contain("Checksum does not match"));
}

#[test]
fn only_the_matching_checksum_is_checked() {
    let backup = ScratchBackup::new(true);
    // A stale checksum for some other archive in the same container.
    fs::write(
        backup.made.container.join("other.sha256"),
        "0000000000000000000000000000000000000000000000000000000000000000  other.tar.gz\n",
    )
    .unwrap();
    let dest = TreeFixture::new();
    let mut decisions = ScriptedDecisions::new().yes_no(true);

    let outcome = restore(backup.archive(), dest.path(), &mut decisions).unwrap();

    assert_matches!(outcome, RestoreOutcome::Restored { .. });
    assert!(decisions.is_finished());
}

#[test]
fn missing_archive() {
    let dest = TreeFixture::new();

    let err = restore(
        &dest.path().join("nothing.tar.gz"),
        dest.path(),
        &mut ScriptedDecisions::new(),
    )
    .unwrap_err();

    assert_matches!(
        err,
        Error::NotFound {
            role: PathRole::Archive,
            ..
        }
    );
    assert!(dir_names(dest.path()).is_empty());
}

#[test]
fn garbage_archive_fails_to_extract() {
    let tf = TreeFixture::new();
    let archive = tf.create_file_with_contents("junk.tar.gz", b"this is not a tarball");
    let dest = TreeFixture::new();

    let err = restore(&archive, dest.path(), &mut ScriptedDecisions::new()).unwrap_err();

    assert_matches!(err, Error::ExtractFailed { .. });
}

#[test]
fn directory_is_not_an_archive() {
    let backup = ScratchBackup::new(false);
    let dest = TreeFixture::new();

    let err = restore(&backup.made.container, dest.path(), &mut ScriptedDecisions::new())
        .unwrap_err();

    assert_matches!(
        err,
        Error::NotFound {
            role: PathRole::Archive,
            ..
        }
    );
    assert!(dir_names(dest.path()).is_empty());
}

#[cfg(unix)]
#[test]
fn unreadable_archive_is_refused() {
    use std::os::unix::fs::PermissionsExt;

    if crate::running_as_root() {
        return;
    }
    let backup = ScratchBackup::new(false);
    fs::set_permissions(backup.archive(), fs::Permissions::from_mode(0o000)).unwrap();
    let dest = TreeFixture::new();

    let result = restore(backup.archive(), dest.path(), &mut ScriptedDecisions::new());

    fs::set_permissions(backup.archive(), fs::Permissions::from_mode(0o644)).unwrap();
    let err = result.unwrap_err();
    assert_matches!(
        err,
        Error::AccessDenied {
            role: PathRole::Archive,
            access: Access::Read,
            ..
        }
    );
    assert!(err.to_string().starts_with("Backup archive is not readable"));
    assert!(dir_names(dest.path()).is_empty());
}

#[cfg(unix)]
#[test]
fn read_only_restore_destination_is_refused() {
    use std::os::unix::fs::PermissionsExt;

    if crate::running_as_root() {
        return;
    }
    let backup = ScratchBackup::new(false);
    let dest = TreeFixture::new();
    let locked = dest.create_dir("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    let result = restore(backup.archive(), &locked, &mut ScriptedDecisions::new());

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let err = result.unwrap_err();
    assert_matches!(
        err,
        Error::AccessDenied {
            role: PathRole::RestoreDestination,
            access: Access::Write,
            ..
        }
    );
    assert!(err
        .to_string()
        .starts_with("Restore destination is not writable"));
    assert!(dir_names(&locked).is_empty());
}
