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

//! Restore an archive into a `{stem}_restored` directory.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::decide::{ConflictChoice, Decide, Question};
use crate::integrity::{checksum_file_name, find_checksum_artifacts, verify};
use crate::paths::{self, strip_archive_suffix};
use crate::tarball;
use crate::{Access, Error, PathRole, Result};

/// Suffix appended to the archive stem to name the restore directory.
pub const RESTORED_SUFFIX: &str = "_restored";

/// How a restore ended, other than by an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The archive was extracted into `path`.
    Restored {
        path: PathBuf,
        /// True if `path` already existed and files in it were replaced.
        overwritten: bool,
    },
    /// The restore directory already existed and the caller chose to stop.
    Declined { existing: PathBuf },
    /// Checksum verification failed and the caller chose not to proceed.
    Aborted { archive: PathBuf },
}

/// The restore directory for an archive stem.
pub fn restore_dir_for(destination: &Path, stem: &str) -> PathBuf {
    destination.join(format!("{stem}{RESTORED_SUFFIX}"))
}

/// Restore `target_archive` into a new directory under `destination`.
///
/// Questions about conflicts and checksum verification go to `decide`.
/// Nothing is written unless the outcome is [RestoreOutcome::Restored].
#[instrument(skip(decide))]
pub fn restore(
    target_archive: &Path,
    destination: &Path,
    decide: &mut dyn Decide,
) -> Result<RestoreOutcome> {
    validate(target_archive, destination)?;

    let archive_text = paths::utf8_text(target_archive)?;
    let leaf = paths::leaf_name(paths::strip_trailing_separator(archive_text));
    let mut restore_dir = restore_dir_for(destination, strip_archive_suffix(leaf));

    if paths::exists(&restore_dir) {
        match decide.on_conflict(&restore_dir)? {
            ConflictChoice::Overwrite => {
                extract(target_archive, &restore_dir)?;
                info!("Restored backup over {restore_dir:?}");
                return Ok(RestoreOutcome::Restored {
                    path: restore_dir,
                    overwritten: true,
                });
            }
            ConflictChoice::New => restore_dir = choose_new_dir(&restore_dir, destination, decide)?,
            ConflictChoice::Exit => {
                info!("Left existing {restore_dir:?} alone");
                return Ok(RestoreOutcome::Declined {
                    existing: restore_dir,
                });
            }
        }
    } else if !integrity_gate(target_archive, leaf, decide)? {
        info!("Restore of {target_archive:?} abandoned after failed verification");
        return Ok(RestoreOutcome::Aborted {
            archive: target_archive.to_owned(),
        });
    }

    extract(target_archive, &restore_dir)?;
    info!("Restored backup to {restore_dir:?}");
    Ok(RestoreOutcome::Restored {
        path: restore_dir,
        overwritten: false,
    })
}

fn validate(target_archive: &Path, destination: &Path) -> Result<()> {
    if !target_archive.is_file() {
        return Err(Error::NotFound {
            role: PathRole::Archive,
            path: target_archive.to_owned(),
        });
    }
    if !paths::readable(target_archive) {
        return Err(Error::AccessDenied {
            role: PathRole::Archive,
            access: Access::Read,
            path: target_archive.to_owned(),
        });
    }
    if !destination.is_dir() {
        return Err(Error::NotFound {
            role: PathRole::RestoreDestination,
            path: destination.to_owned(),
        });
    }
    if !paths::writable(destination) {
        return Err(Error::AccessDenied {
            role: PathRole::RestoreDestination,
            access: Access::Write,
            path: destination.to_owned(),
        });
    }
    Ok(())
}

/// Ask for names until one gives a restore directory that doesn't exist yet.
///
/// Names are not numbered automatically here, unlike backup containers:
/// the operator picks each one.
fn choose_new_dir(taken: &Path, destination: &Path, decide: &mut dyn Decide) -> Result<PathBuf> {
    let mut taken = taken.to_owned();
    loop {
        let name = decide.new_name(&taken)?;
        if !paths::is_plain_name(&name) {
            warn!("Can't restore to a directory named {name:?}");
            continue;
        }
        let candidate = restore_dir_for(destination, &name);
        if !paths::exists(&candidate) {
            return Ok(candidate);
        }
        warn!("{candidate:?} also exists");
        taken = candidate;
    }
}

/// Offer to verify checksums beside the archive.
///
/// Returns false if verification failed and the caller doesn't want to
/// continue. If there is a checksum file named for this archive, only that
/// one is checked; otherwise every checksum file in the directory is.
fn integrity_gate(target_archive: &Path, leaf: &str, decide: &mut dyn Decide) -> Result<bool> {
    let archive_dir = paths::containing_dir(target_archive);
    let found = find_checksum_artifacts(archive_dir);
    if found.is_empty() {
        debug!(?archive_dir, "No checksum files");
        return Ok(true);
    }
    if !decide.confirm(Question::VerifyChecksum {
        archive: target_archive,
    })? {
        debug!("Verification declined");
        return Ok(true);
    }
    let own = checksum_file_name(leaf);
    let to_check: Vec<&String> = if found.contains(&own) {
        found.iter().filter(|name| **name == own).collect()
    } else {
        found.iter().collect()
    };
    // Check all of them, so each failure is logged.
    let failures = to_check
        .into_iter()
        .filter(|name| !verify(&archive_dir.join(name)))
        .count();
    if failures == 0 {
        return Ok(true);
    }
    decide.confirm(Question::ProceedAfterFailedVerify {
        archive: target_archive,
    })
}

fn extract(target_archive: &Path, restore_dir: &Path) -> Result<()> {
    create_dir_all(restore_dir).map_err(|source| Error::CreateDirectory {
        path: restore_dir.to_owned(),
        source,
    })?;
    tarball::unpack(target_archive, restore_dir).map_err(|source| Error::ExtractFailed {
        archive: target_archive.to_owned(),
        destination: restore_dir.to_owned(),
        source,
    })
}
