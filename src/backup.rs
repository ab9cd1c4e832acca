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

//! Make a backup by packing a source file or directory into a new numbered
//! container under the destination.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::compress::CompressionLevel;
use crate::integrity::create_hash;
use crate::naming::resolve_container;
use crate::paths;
use crate::tarball;
use crate::{Access, Error, PathRole, Result};

/// Name of the note file inside a container.
pub const NOTE_FILE_NAME: &str = "note.txt";

/// Description of a backup to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRequest {
    /// File or directory to back up.
    pub source: PathBuf,

    /// Existing directory to hold the new container.
    pub destination: PathBuf,

    pub compression: CompressionLevel,

    /// Write a checksum file beside the archive.
    pub want_hash: bool,

    /// Text to store in `note.txt` in the container.
    pub note: Option<String>,

    /// Name the container after this rather than the source.
    pub container_name: Option<String>,
}

impl BackupRequest {
    pub fn new<S: Into<PathBuf>, D: Into<PathBuf>>(source: S, destination: D) -> BackupRequest {
        BackupRequest {
            source: source.into(),
            destination: destination.into(),
            compression: CompressionLevel::default(),
            want_hash: false,
            note: None,
            container_name: None,
        }
    }
}

/// Everything written by one backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupArchive {
    /// The numbered directory holding this backup.
    pub container: PathBuf,
    /// The archive file.
    pub archive: PathBuf,
    pub checksum: Option<PathBuf>,
    pub note: Option<PathBuf>,
}

/// Back up the requested source into a new container.
///
/// All validation happens before anything is written. If packing fails, the
/// container and anything already in it are left in place to be inspected.
#[instrument]
pub fn create_backup(request: &BackupRequest) -> Result<BackupArchive> {
    validate(request)?;

    let source_text = paths::utf8_text(&request.source)?;
    let source_text = paths::strip_trailing_separator(source_text);
    let working_dir = Path::new(paths::parent_dir(source_text));
    let leaf = paths::leaf_name(source_text);
    if !paths::is_plain_name(leaf) {
        return Err(Error::InvalidName {
            name: leaf.to_owned(),
            path: request.source.clone(),
        });
    }
    let name = request.container_name.as_deref().unwrap_or(leaf);
    if !paths::is_plain_name(name) {
        return Err(Error::InvalidName {
            name: name.to_owned(),
            path: request.destination.clone(),
        });
    }

    let container = resolve_container(name, &request.destination);
    fs::create_dir(&container).map_err(|source| Error::CreateDirectory {
        path: container.clone(),
        source,
    })?;

    let note = match &request.note {
        Some(text) => {
            let note_path = container.join(NOTE_FILE_NAME);
            fs::write(&note_path, text).map_err(|source| Error::WriteNote {
                path: note_path.clone(),
                source,
            })?;
            info!("Note added at {note_path:?}");
            Some(note_path)
        }
        None => None,
    };

    let archive_name = request.compression.archive_name(leaf);
    let archive = container.join(&archive_name);
    write_archive(working_dir, leaf, &archive, request.compression).map_err(|source| {
        Error::ArchiveFailed {
            path: archive.clone(),
            source,
        }
    })?;
    info!("Backup created at {archive:?}");

    let checksum = if request.want_hash {
        let checksum = create_hash(&archive_name, &container)?;
        info!("Checksum written to {checksum:?}");
        Some(checksum)
    } else {
        None
    };

    Ok(BackupArchive {
        container,
        archive,
        checksum,
        note,
    })
}

fn validate(request: &BackupRequest) -> Result<()> {
    let source = &request.source;
    if !paths::exists(source) {
        return Err(Error::NotFound {
            role: PathRole::Source,
            path: source.clone(),
        });
    }
    if !paths::readable(source) {
        return Err(Error::AccessDenied {
            role: PathRole::Source,
            access: Access::Read,
            path: source.clone(),
        });
    }
    let destination = &request.destination;
    if !destination.is_dir() {
        return Err(Error::NotFound {
            role: PathRole::BackupDestination,
            path: destination.clone(),
        });
    }
    if !paths::writable(destination) {
        return Err(Error::AccessDenied {
            role: PathRole::BackupDestination,
            access: Access::Write,
            path: destination.clone(),
        });
    }
    // The archive would be written into the tree being archived.
    if fs::symlink_metadata(source).is_ok_and(|m| m.is_dir()) {
        if let (Ok(source_dir), Ok(destination_dir)) =
            (source.canonicalize(), destination.canonicalize())
        {
            if destination_dir.starts_with(&source_dir) {
                return Err(Error::DestinationInsideSource {
                    path: source.clone(),
                    destination: destination.clone(),
                });
            }
        }
    }
    Ok(())
}

fn write_archive(
    working_dir: &Path,
    leaf: &str,
    archive: &Path,
    compression: CompressionLevel,
) -> io::Result<()> {
    fail::fail_point!("keepsake::backup::write-archive", |_| {
        Err(io::Error::new(io::ErrorKind::Other, "injected archive failure"))
    });
    tarball::pack(working_dir, leaf, archive, compression)
}
