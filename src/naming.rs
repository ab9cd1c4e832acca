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

//! Numbered backup container names.
//!
//! Each backup goes into a fresh directory `{n}-{name}` under the
//! destination, where `n` is the lowest number not already taken. Nothing
//! here creates the directory: there is a window between probing and
//! creation in which another process could take the same name.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::paths;

/// The directory name for copy number `copy_num` of `name`.
pub fn container_name(copy_num: u64, name: &str) -> String {
    format!("{copy_num}-{name}")
}

/// Find the first unused `{n}-{name}` directory under `destination_root`.
pub fn resolve_container(name: &str, destination_root: &Path) -> PathBuf {
    let mut copy_num = 0;
    loop {
        let candidate = destination_root.join(container_name(copy_num, name));
        if !paths::exists(&candidate) {
            trace!(?candidate, "Resolved backup container");
            return candidate;
        }
        copy_num += 1;
    }
}
