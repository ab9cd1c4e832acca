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

//! Utilities to set up test environments.
//!
//! Fixtures that create directories will be automatically deleted when the object
//! is deleted.

use std::collections::VecDeque;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::backup::{create_backup, BackupArchive, BackupRequest};
use crate::compress::CompressionLevel;
use crate::decide::{ConflictChoice, Decide, Question};
use crate::Result;

/// A temporary tree for running a test.
///
/// Created in a temporary directory and automatically disposed when done.
pub struct TreeFixture {
    pub root: PathBuf,
    _tempdir: TempDir, // held only for cleanup
}

impl TreeFixture {
    pub fn new() -> TreeFixture {
        let tempdir = TempDir::new().unwrap();
        let root = tempdir.path().to_path_buf();
        TreeFixture {
            _tempdir: tempdir,
            root,
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Make a file in the tree, with arbitrary contents. Returns the full path.
    pub fn create_file(&self, relative_path: &str) -> PathBuf {
        self.create_file_with_contents(relative_path, b"contents")
    }

    /// Make a file in the tree, with given contents. Returns the full path.
    pub fn create_file_with_contents(&self, relative_path: &str, contents: &[u8]) -> PathBuf {
        let full_path = self.root.join(relative_path);
        let mut f = fs::File::create(&full_path).unwrap();
        f.write_all(contents).unwrap();
        full_path
    }

    pub fn create_dir(&self, relative_path: &str) -> PathBuf {
        let full_path = self.root.join(relative_path);
        fs::create_dir(&full_path).unwrap();
        full_path
    }

    #[cfg(unix)]
    pub fn create_symlink(&self, relative_path: &str, target: &str) {
        use std::os::unix::fs as unix_fs;

        unix_fs::symlink(target, self.root.join(relative_path)).unwrap();
    }

    /// Symlinks are just not present on Windows.
    #[cfg(windows)]
    pub fn create_symlink(&self, _relative_path: &str, _target: &str) {}
}

impl Default for TreeFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A backup of a small `src` tree, made into a temporary destination.
///
/// The source holds `src/hello` and `src/subdir/subfile`.
pub struct ScratchBackup {
    pub source: TreeFixture,
    pub destination: TreeFixture,
    pub made: BackupArchive,
}

impl ScratchBackup {
    pub fn new(want_hash: bool) -> ScratchBackup {
        let source = TreeFixture::new();
        source.create_dir("src");
        source.create_file_with_contents("src/hello", b"hello world");
        source.create_dir("src/subdir");
        source.create_file("src/subdir/subfile");
        let destination = TreeFixture::new();
        let mut request = BackupRequest::new(source.path().join("src"), destination.path());
        request.compression = CompressionLevel::default();
        request.want_hash = want_hash;
        let made = create_backup(&request).unwrap();
        ScratchBackup {
            source,
            destination,
            made,
        }
    }

    /// Path of the archive file.
    pub fn archive(&self) -> &Path {
        &self.made.archive
    }

    /// Change one byte in the middle of the archive.
    pub fn damage_archive(&self) {
        let mut bytes = fs::read(self.archive()).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0x01;
        fs::write(self.archive(), bytes).unwrap();
    }
}

/// One canned answer for [ScriptedDecisions].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Conflict(ConflictChoice),
    Name(String),
    Confirm(bool),
}

/// Decisions given in advance by a test, in the order they'll be asked.
///
/// Panics if asked something it has no answer for, so tests notice
/// unexpected questions.
#[derive(Debug, Default)]
pub struct ScriptedDecisions {
    answers: VecDeque<Answer>,
    asked: Vec<String>,
}

impl ScriptedDecisions {
    pub fn new() -> ScriptedDecisions {
        ScriptedDecisions::default()
    }

    pub fn conflict(mut self, choice: ConflictChoice) -> Self {
        self.answers.push_back(Answer::Conflict(choice));
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.answers.push_back(Answer::Name(name.to_owned()));
        self
    }

    pub fn yes_no(mut self, answer: bool) -> Self {
        self.answers.push_back(Answer::Confirm(answer));
        self
    }

    /// Descriptions of the questions asked so far.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// True if every answer was used.
    pub fn is_finished(&self) -> bool {
        self.answers.is_empty()
    }

    fn next(&mut self, question: String) -> Answer {
        let answer = self
            .answers
            .pop_front()
            .unwrap_or_else(|| panic!("no answer scripted for {question:?}"));
        self.asked.push(question);
        answer
    }
}

impl Decide for ScriptedDecisions {
    fn on_conflict(&mut self, existing: &Path) -> Result<ConflictChoice> {
        match self.next(format!("conflict {existing:?}")) {
            Answer::Conflict(choice) => Ok(choice),
            other => panic!("expected a conflict answer, have {other:?}"),
        }
    }

    fn new_name(&mut self, taken: &Path) -> Result<String> {
        match self.next(format!("new name for {taken:?}")) {
            Answer::Name(name) => Ok(name),
            other => panic!("expected a name, have {other:?}"),
        }
    }

    fn confirm(&mut self, question: Question<'_>) -> Result<bool> {
        match self.next(question.to_string()) {
            Answer::Confirm(answer) => Ok(answer),
            other => panic!("expected yes/no, have {other:?}"),
        }
    }
}
