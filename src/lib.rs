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

//! Keepsake local backups.
//!
//! Each backup of a source file or directory goes into a new numbered
//! container under the destination, `{n}-{name}/`, holding a tar archive
//! (gzipped unless the compression level is 0), an optional `note.txt`,
//! and an optional SHA-256 checksum file. Restore extracts an archive into
//! `{stem}_restored/`, asking the caller through [Decide] what to do about
//! existing directories and checksum failures.

pub mod backup;
pub mod compress;
pub mod decide;
mod errors;
pub mod integrity;
pub mod naming;
pub mod paths;
pub mod restore;
pub mod tarball;
pub mod termui;
pub mod test_fixtures;

pub use crate::backup::{create_backup, BackupArchive, BackupRequest, NOTE_FILE_NAME};
pub use crate::compress::CompressionLevel;
pub use crate::decide::{
    ConflictChoice, ConflictPolicy, Decide, FixedDecisions, LinePrompter, Question,
};
pub use crate::errors::{Access, Error, PathRole, Result};
pub use crate::integrity::{
    check, create_hash, find_checksum_artifacts, hash_archive, verify, CHECKSUM_SUFFIX,
};
pub use crate::naming::resolve_container;
pub use crate::restore::{restore, RestoreOutcome, RESTORED_SUFFIX};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
