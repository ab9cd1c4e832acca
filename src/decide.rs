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

//! Decisions the library asks its caller to make: a terminal, a script, or a test.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::str::FromStr;

use crate::paths;
use crate::{Error, Result};

/// What to do when the restore directory already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Extract into the existing directory, replacing files.
    Overwrite,
    /// Restore under a different name, to be asked for next.
    New,
    /// Stop without changing anything.
    Exit,
}

impl FromStr for ConflictChoice {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" | "o" => Ok(ConflictChoice::Overwrite),
            "new" | "n" => Ok(ConflictChoice::New),
            "exit" | "e" => Ok(ConflictChoice::Exit),
            _ => Err(()),
        }
    }
}

/// A yes/no question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question<'a> {
    /// Checksum files were found beside the archive: check them first?
    VerifyChecksum { archive: &'a Path },
    /// Verification failed: restore anyway?
    ProceedAfterFailedVerify { archive: &'a Path },
    /// A checksum file is already there: replace it?
    OverwriteChecksum(&'a Path),
}

impl fmt::Display for Question<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Question::VerifyChecksum { archive } => {
                write!(f, "Checksum found for {archive:?}. Verify before restoring?")
            }
            Question::ProceedAfterFailedVerify { archive } => write!(
                f,
                "Verification of {archive:?} failed. Restore it anyway?"
            ),
            Question::OverwriteChecksum(path) => {
                write!(f, "Checksum file {path:?} already exists. Overwrite?")
            }
        }
    }
}

/// Parse a yes/no answer.
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Makes the decisions the library can't make on its own.
///
/// Implementations return a valid answer or an error; they never guess.
pub trait Decide {
    /// The restore directory `existing` is already present.
    fn on_conflict(&mut self, existing: &Path) -> Result<ConflictChoice>;

    /// A replacement name for a restore directory; `taken` is the path
    /// that was already in use.
    fn new_name(&mut self, taken: &Path) -> Result<String>;

    fn confirm(&mut self, question: Question<'_>) -> Result<bool>;
}

/// Asks questions on a line-oriented stream, such as a terminal.
///
/// Unrecognized answers are explained and asked again. End of input is an
/// error.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LinePrompter { input, output }
    }

    /// Consume the prompter, returning the output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt} ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended while waiting for an answer",
            )
            .into());
        }
        Ok(line.trim().to_owned())
    }

    fn tell(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }
}

impl LinePrompter<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr and read answers from stdin.
    pub fn stdio() -> Self {
        LinePrompter::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Decide for LinePrompter<R, W> {
    fn on_conflict(&mut self, existing: &Path) -> Result<ConflictChoice> {
        self.tell(&format!("Restore directory {existing:?} already exists."))?;
        let mut prompt = "Overwrite it, restore to a new directory, or exit? [overwrite/new/exit]:";
        loop {
            if let Ok(choice) = self.ask(prompt)?.parse() {
                return Ok(choice);
            }
            prompt = "Invalid input. Please enter \"overwrite\", \"new\", or \"exit\":";
        }
    }

    fn new_name(&mut self, taken: &Path) -> Result<String> {
        let mut prompt = "Enter a new directory name:".to_owned();
        loop {
            let name = self.ask(&prompt)?;
            if paths::is_plain_name(&name) {
                return Ok(name);
            }
            prompt = format!(
                "{name:?} can't be used for a directory beside {taken:?}. Enter a plain name:"
            );
        }
    }

    fn confirm(&mut self, question: Question<'_>) -> Result<bool> {
        let mut prompt = format!("{question} [y/n]:");
        loop {
            if let Some(answer) = parse_yes_no(&self.ask(&prompt)?) {
                return Ok(answer);
            }
            prompt = "Invalid input. Please enter \"y\" or \"n\":".to_owned();
        }
    }
}

/// What a non-interactive caller does when the restore directory exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    Overwrite,
    /// Leave everything alone and report that nothing was restored.
    #[default]
    Exit,
    /// Fail with [Error::NameConflict].
    Fail,
}

/// Answers fixed in advance, for scripts and other callers with no operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDecisions {
    pub on_conflict: ConflictPolicy,
    /// Verify checksums before restoring, when there are any.
    pub verify: bool,
    /// Restore even if verification failed.
    pub proceed_on_failed_verify: bool,
    /// Replace an existing checksum file.
    pub overwrite_checksum: bool,
}

impl Default for FixedDecisions {
    fn default() -> Self {
        FixedDecisions {
            on_conflict: ConflictPolicy::default(),
            verify: true,
            proceed_on_failed_verify: false,
            overwrite_checksum: false,
        }
    }
}

impl Decide for FixedDecisions {
    fn on_conflict(&mut self, existing: &Path) -> Result<ConflictChoice> {
        match self.on_conflict {
            ConflictPolicy::Overwrite => Ok(ConflictChoice::Overwrite),
            ConflictPolicy::Exit => Ok(ConflictChoice::Exit),
            ConflictPolicy::Fail => Err(Error::NameConflict {
                path: existing.to_owned(),
            }),
        }
    }

    fn new_name(&mut self, taken: &Path) -> Result<String> {
        Err(Error::NameConflict {
            path: taken.to_owned(),
        })
    }

    fn confirm(&mut self, question: Question<'_>) -> Result<bool> {
        Ok(match question {
            Question::VerifyChecksum { .. } => self.verify,
            Question::ProceedAfterFailedVerify { .. } => self.proceed_on_failed_verify,
            Question::OverwriteChecksum(_) => self.overwrite_checksum,
        })
    }
}
