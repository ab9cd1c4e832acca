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

//! Keepsake error types.

use std::io;
use std::path::PathBuf;

use derive_more::Display;
use thiserror::Error;

/// Which path an error is about, so each validation failure reads differently.
#[derive(Debug, Display, PartialEq, Eq, Clone, Copy)]
pub enum PathRole {
    #[display(fmt = "Backup source")]
    Source,

    #[display(fmt = "Backup destination")]
    BackupDestination,

    #[display(fmt = "Backup archive")]
    Archive,

    #[display(fmt = "Restore destination")]
    RestoreDestination,
}

#[derive(Debug, Display, PartialEq, Eq, Clone, Copy)]
pub enum Access {
    #[display(fmt = "readable")]
    Read,

    #[display(fmt = "writable")]
    Write,
}

/// Keepsake specific error.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("{role} does not exist: {path:?}")]
    NotFound { role: PathRole, path: PathBuf },

    #[error("{role} is not {access}: {path:?}")]
    AccessDenied {
        role: PathRole,
        access: Access,
        path: PathBuf,
    },

    #[error("Failed to write archive {path:?}")]
    ArchiveFailed { path: PathBuf, source: io::Error },

    #[error("Failed to extract {archive:?} into {destination:?}")]
    ExtractFailed {
        archive: PathBuf,
        destination: PathBuf,
        source: io::Error,
    },

    #[error("Checksum failed for {path:?}: {details}")]
    HashFailed { path: PathBuf, details: String },

    #[error("Checksum does not match for {path:?}")]
    ChecksumMismatch { path: PathBuf },

    #[error("Restore directory already exists: {path:?}")]
    NameConflict { path: PathBuf },

    #[error("Can't use {name:?} as a directory name for {path:?}")]
    InvalidName { name: String, path: PathBuf },

    #[error("Backup destination {destination:?} is inside the backup source {path:?}")]
    DestinationInsideSource { path: PathBuf, destination: PathBuf },

    #[error("Invalid compression level {level}: must be between 0 and 9")]
    InvalidCompressionLevel { level: u32 },

    #[error("Failed to create directory {path:?}")]
    CreateDirectory { path: PathBuf, source: io::Error },

    #[error("Failed to write note {path:?}")]
    WriteNote { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Io {
        #[from]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
