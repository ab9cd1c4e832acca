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

use assert_matches::assert_matches;
use fail::FailScenario;

use keepsake::test_fixtures::TreeFixture;
use keepsake::*;

#[test]
fn archive_failure_leaves_container_for_inspection() {
    let scenario = FailScenario::setup();
    fail::cfg("keepsake::backup::write-archive", "return").unwrap();
    let source = TreeFixture::new();
    source.create_dir("src");
    source.create_file("src/hello");
    let dest = TreeFixture::new();
    let mut request = BackupRequest::new(source.path().join("src"), dest.path());
    request.want_hash = true;
    request.note = Some("doomed".to_owned());

    let err = create_backup(&request).unwrap_err();

    assert_matches!(err, Error::ArchiveFailed { .. });
    let source = std::error::Error::source(&err).unwrap();
    assert_eq!(source.to_string(), "injected archive failure");
    let container = dest.path().join("0-src");
    assert!(container.is_dir());
    assert!(container.join(NOTE_FILE_NAME).is_file());
    assert!(!container.join("src.tar.gz").exists());
    assert!(!container.join("src.sha256").exists());
    scenario.teardown();
}
