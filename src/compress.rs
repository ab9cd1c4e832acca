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

//! Archive compression level.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A gzip compression level from 0 to 9, where 0 means a plain tar stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CompressionLevel(u32);

impl CompressionLevel {
    pub const NONE: CompressionLevel = CompressionLevel(0);
    pub const MAX: CompressionLevel = CompressionLevel(9);

    pub fn new(level: u32) -> Result<CompressionLevel> {
        if level <= 9 {
            Ok(CompressionLevel(level))
        } else {
            Err(Error::InvalidCompressionLevel { level })
        }
    }

    pub fn level(self) -> u32 {
        self.0
    }

    pub fn is_compressed(self) -> bool {
        self.0 != 0
    }

    /// File extension for archives written at this level, including the leading dot.
    pub fn archive_extension(self) -> &'static str {
        if self.is_compressed() {
            ".tar.gz"
        } else {
            ".tar"
        }
    }

    /// File name for an archive of `leaf` at this level.
    pub fn archive_name(self, leaf: &str) -> String {
        format!("{leaf}{}", self.archive_extension())
    }
}

/// Level 6, the usual gzip default.
impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel(6)
    }
}

impl From<CompressionLevel> for flate2::Compression {
    fn from(level: CompressionLevel) -> flate2::Compression {
        flate2::Compression::new(level.0)
    }
}

impl FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let level: u32 = s
            .parse()
            .map_err(|_| format!("{s:?} is not a compression level"))?;
        CompressionLevel::new(level).map_err(|e| e.to_string())
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
