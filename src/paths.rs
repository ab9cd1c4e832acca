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

//! Path string helpers and permission probes.
//!
//! The string functions work on the path text as given, so that names
//! derived from them (containers, archives, restore directories) are
//! predictable from what the operator typed.

use std::path::{is_separator, Path};

use crate::{Error, Result};

/// True if anything exists at `path`, including a dangling symlink.
pub fn exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// True if the current process may read `path`.
#[cfg(unix)]
pub fn readable(path: &Path) -> bool {
    use nix::unistd::{access, AccessFlags};
    access(path, AccessFlags::R_OK).is_ok()
}

/// True if the current process may create or modify entries in `path`.
#[cfg(unix)]
pub fn writable(path: &Path) -> bool {
    use nix::unistd::{access, AccessFlags};
    access(path, AccessFlags::W_OK).is_ok()
}

#[cfg(not(unix))]
#[mutants::skip]
pub fn readable(path: &Path) -> bool {
    if path.is_dir() {
        std::fs::read_dir(path).is_ok()
    } else {
        std::fs::File::open(path).is_ok()
    }
}

#[cfg(not(unix))]
#[mutants::skip]
pub fn writable(path: &Path) -> bool {
    path.metadata()
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}

/// The path as text, for the string helpers below.
///
/// Names that aren't UTF-8 are refused with `InvalidName`.
pub fn utf8_text(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| Error::InvalidName {
        name: path.to_string_lossy().into_owned(),
        path: path.to_owned(),
    })
}

/// Remove one trailing separator, unless the path is only a separator.
pub fn strip_trailing_separator(path: &str) -> &str {
    match path.char_indices().last() {
        Some((i, c)) if i > 0 && is_separator(c) => &path[..i],
        _ => path,
    }
}

/// The final component of `path`, after the last separator.
///
/// The caller should strip any trailing separator first.
pub fn leaf_name(path: &str) -> &str {
    match path.rfind(is_separator) {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

/// Everything up to and including the last separator.
///
/// A bare name has an empty parent, meaning the current directory.
pub fn parent_dir(path: &str) -> &str {
    match path.rfind(is_separator) {
        Some(i) => &path[..=i],
        None => "",
    }
}

/// True if `name` can be used as a single new directory name: not empty,
/// not `.` or `..`, and without separators.
pub fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(is_separator)
}

/// The directory holding `path`, as something that can be opened: `.` rather
/// than an empty path for a bare file name.
pub fn containing_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Strip one `.gz` and then one `.tar` from the end of an archive file name.
pub fn strip_archive_suffix(name: &str) -> &str {
    let name = name.strip_suffix(".gz").unwrap_or(name);
    name.strip_suffix(".tar").unwrap_or(name)
}
