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

//! SHA-256 checksum files beside archives.
//!
//! A checksum file is named after the archive with its `.tar`/`.gz`
//! suffixes replaced by `.sha256`, and holds lines in the same format
//! `sha256sum` writes and checks: 64 hex digits, two spaces, file name.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

use crate::decide::{Decide, Question};
use crate::paths::{self, strip_archive_suffix};
use crate::{Access, Error, PathRole, Result};

/// Extension of checksum files, including the dot.
pub const CHECKSUM_SUFFIX: &str = ".sha256";

const DIGEST_HEX_LEN: usize = 64;

/// One line of a checksum file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumLine {
    /// Lowercase hex SHA-256 digest.
    pub digest: String,
    /// File name relative to the checksum file's directory.
    pub file_name: String,
}

impl FromStr for ChecksumLine {
    type Err = String;

    /// Parse `digest  name`, or `digest *name` as written in binary mode.
    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let malformed = || format!("improperly formatted checksum line: {line:?}");
        if !line.is_char_boundary(DIGEST_HEX_LEN) {
            return Err(malformed());
        }
        let (digest, rest) = line.split_at(DIGEST_HEX_LEN);
        if !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(malformed());
        }
        let file_name = rest
            .strip_prefix("  ")
            .or_else(|| rest.strip_prefix(" *"))
            .filter(|name| !name.is_empty())
            .ok_or_else(malformed)?;
        Ok(ChecksumLine {
            digest: digest.to_ascii_lowercase(),
            file_name: file_name.to_owned(),
        })
    }
}

impl fmt::Display for ChecksumLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}", self.digest, self.file_name)
    }
}

/// The checksum file name for an archive file name.
pub fn checksum_file_name(archive_name: &str) -> String {
    format!("{}{CHECKSUM_SUFFIX}", strip_archive_suffix(archive_name))
}

/// Hex SHA-256 of the file's contents, read in a stream.
pub fn file_digest(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Hash `working_dir/file_name` and write its checksum file in `working_dir`.
///
/// An existing checksum file of the same name is replaced. Returns the path
/// of the checksum file.
#[instrument]
pub fn create_hash(file_name: &str, working_dir: &Path) -> Result<PathBuf> {
    let target = working_dir.join(file_name);
    let digest = file_digest(&target).map_err(|err| Error::HashFailed {
        path: target.clone(),
        details: err.to_string(),
    })?;
    let line = ChecksumLine {
        digest,
        file_name: file_name.to_owned(),
    };
    let checksum_path = working_dir.join(checksum_file_name(file_name));
    write_checksum_file(&checksum_path, &line).map_err(|err| Error::HashFailed {
        path: checksum_path.clone(),
        details: err.to_string(),
    })?;
    debug!(?checksum_path, digest = %line.digest, "Wrote checksum");
    Ok(checksum_path)
}

fn write_checksum_file(path: &Path, line: &ChecksumLine) -> io::Result<()> {
    let dir = paths::containing_dir(path);
    let mut temp = NamedTempFile::new_in(dir)?;
    writeln!(temp, "{line}")?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Check every line of a checksum file against the files it names.
///
/// File names are resolved relative to the checksum file's directory.
pub fn check(checksum_path: &Path) -> Result<()> {
    let content = fs::read_to_string(checksum_path).map_err(|err| Error::HashFailed {
        path: checksum_path.to_owned(),
        details: err.to_string(),
    })?;
    let dir = paths::containing_dir(checksum_path);
    let mut checked = 0;
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line: ChecksumLine = line.parse().map_err(|details| Error::HashFailed {
            path: checksum_path.to_owned(),
            details: format!("line {}: {details}", i + 1),
        })?;
        let target = dir.join(&line.file_name);
        let actual = file_digest(&target).map_err(|err| Error::HashFailed {
            path: target.clone(),
            details: err.to_string(),
        })?;
        if actual != line.digest {
            return Err(Error::ChecksumMismatch { path: target });
        }
        checked += 1;
    }
    if checked == 0 {
        return Err(Error::HashFailed {
            path: checksum_path.to_owned(),
            details: "no properly formatted checksum lines found".to_owned(),
        });
    }
    Ok(())
}

/// True if the checksum file parses and every file it names matches.
///
/// Failures are logged, not returned.
#[instrument]
pub fn verify(checksum_path: &Path) -> bool {
    match check(checksum_path) {
        Ok(()) => {
            info!("Checksum OK: {checksum_path:?}");
            true
        }
        Err(err) => {
            warn!("{err}");
            false
        }
    }
}

/// Names of checksum files in `directory`, in listing order.
///
/// An unreadable directory has none.
pub fn find_checksum_artifacts(directory: &Path) -> Vec<String> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(?directory, "Can't list directory for checksums: {err}");
            return Vec::new();
        }
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(CHECKSUM_SUFFIX))
        .collect()
}

/// Write a checksum file for an existing archive.
///
/// If the checksum file already exists, `decide` is asked whether to replace
/// it; on refusal nothing is written and `None` is returned.
pub fn hash_archive(archive: &Path, decide: &mut dyn Decide) -> Result<Option<PathBuf>> {
    if !archive.is_file() {
        return Err(Error::NotFound {
            role: PathRole::Archive,
            path: archive.to_owned(),
        });
    }
    if !paths::readable(archive) {
        return Err(Error::AccessDenied {
            role: PathRole::Archive,
            access: Access::Read,
            path: archive.to_owned(),
        });
    }
    let file_name = paths::leaf_name(paths::utf8_text(archive)?);
    let working_dir = paths::containing_dir(archive);
    let existing = working_dir.join(checksum_file_name(file_name));
    if paths::exists(&existing) && !decide.confirm(Question::OverwriteChecksum(&existing))? {
        info!("Kept existing checksum {existing:?}");
        return Ok(None);
    }
    create_hash(file_name, working_dir).map(Some)
}
