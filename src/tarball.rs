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

//! Read and write tar archives, optionally gzipped.
//!
//! Archives hold a single top-level entry, the source leaf, with every path
//! relative to the source's parent directory.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tracing::trace;

use crate::compress::CompressionLevel;

/// First two bytes of every gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Pack `working_dir/leaf` into a new archive file at `output`.
///
/// `leaf` may be a directory, which is archived recursively, or a single file.
/// Symlinks are stored as links, not followed.
pub fn pack(
    working_dir: &Path,
    leaf: &str,
    output: &Path,
    level: CompressionLevel,
) -> io::Result<()> {
    let out = BufWriter::new(File::create(output)?);
    if level.is_compressed() {
        let gz = write_entries(GzEncoder::new(out, level.into()), working_dir, leaf)?;
        gz.finish()?.flush()
    } else {
        write_entries(out, working_dir, leaf)?.flush()
    }
}

fn write_entries<W: Write>(out: W, working_dir: &Path, leaf: &str) -> io::Result<W> {
    let source = working_dir.join(leaf);
    let mut builder = tar::Builder::new(out);
    builder.follow_symlinks(false);
    if source.symlink_metadata()?.is_dir() {
        builder.append_dir_all(leaf, &source)?;
    } else {
        builder.append_path_with_name(&source, leaf)?;
    }
    trace!(?source, "Wrote archive entries");
    builder.into_inner()
}

/// Extract every entry of `archive` into `destination`, replacing files that
/// already exist there.
///
/// Gzip compression is detected from the content, not the file name.
pub fn unpack(archive: &Path, destination: &Path) -> io::Result<()> {
    let mut reader = BufReader::new(File::open(archive)?);
    if is_gzip(&mut reader)? {
        unpack_from(GzDecoder::new(reader), destination)
    } else {
        unpack_from(reader, destination)
    }
}

fn unpack_from<R: Read>(reader: R, destination: &Path) -> io::Result<()> {
    let mut archive = tar::Archive::new(reader);
    archive.set_overwrite(true);
    archive.set_preserve_mtime(true);
    archive.unpack(destination)
}

/// List the paths stored in `archive`, in archive order.
pub fn entry_paths(archive: &Path) -> io::Result<Vec<PathBuf>> {
    let mut reader = BufReader::new(File::open(archive)?);
    if is_gzip(&mut reader)? {
        list_from(GzDecoder::new(reader))
    } else {
        list_from(reader)
    }
}

fn list_from<R: Read>(reader: R) -> io::Result<Vec<PathBuf>> {
    let mut archive = tar::Archive::new(reader);
    let mut names = Vec::new();
    for entry in archive.entries()? {
        names.push(entry?.path()?.into_owned());
    }
    Ok(names)
}

fn is_gzip<R: Read>(reader: &mut BufReader<R>) -> io::Result<bool> {
    Ok(reader.fill_buf()?.starts_with(&GZIP_MAGIC))
}
