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

//! Decisions taken from command-line options, or asked on the terminal.

use std::io::{Stderr, StdinLock};
use std::path::Path;

use keepsake::{
    ConflictChoice, ConflictPolicy, Decide, FixedDecisions, LinePrompter, Question, Result,
};

/// `--on-conflict`
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnConflict {
    /// Ask on the terminal.
    Ask,
    /// Extract into the existing directory.
    Overwrite,
    /// Leave it alone and stop.
    Exit,
    /// Stop with an error.
    Fail,
}

/// `--verify`
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerifyMode {
    /// Ask on the terminal.
    Ask,
    Yes,
    No,
}

/// Answers from options where given, otherwise from the terminal.
pub struct CliDecisions {
    fixed: FixedDecisions,
    ask_on_conflict: bool,
    ask_verify: bool,
    ask_proceed: bool,
    ask_overwrite: bool,
    prompter: LinePrompter<StdinLock<'static>, Stderr>,
}

impl CliDecisions {
    fn new(fixed: FixedDecisions) -> CliDecisions {
        CliDecisions {
            fixed,
            ask_on_conflict: false,
            ask_verify: false,
            ask_proceed: false,
            ask_overwrite: false,
            prompter: LinePrompter::stdio(),
        }
    }

    pub fn for_restore(on_conflict: OnConflict, verify: VerifyMode, force: bool) -> CliDecisions {
        let mut decisions = CliDecisions::new(FixedDecisions {
            on_conflict: match on_conflict {
                OnConflict::Overwrite => ConflictPolicy::Overwrite,
                OnConflict::Fail => ConflictPolicy::Fail,
                OnConflict::Ask | OnConflict::Exit => ConflictPolicy::Exit,
            },
            verify: verify != VerifyMode::No,
            proceed_on_failed_verify: force,
            overwrite_checksum: false,
        });
        decisions.ask_on_conflict = on_conflict == OnConflict::Ask;
        decisions.ask_verify = verify == VerifyMode::Ask;
        // Scripts that chose --verify=yes get a clean abort, not a question.
        decisions.ask_proceed = verify == VerifyMode::Ask && !force;
        decisions
    }

    pub fn for_hash(force: bool) -> CliDecisions {
        let mut decisions = CliDecisions::new(FixedDecisions {
            overwrite_checksum: force,
            ..FixedDecisions::default()
        });
        decisions.ask_overwrite = !force;
        decisions
    }
}

impl Decide for CliDecisions {
    fn on_conflict(&mut self, existing: &Path) -> Result<ConflictChoice> {
        if self.ask_on_conflict {
            self.prompter.on_conflict(existing)
        } else {
            self.fixed.on_conflict(existing)
        }
    }

    fn new_name(&mut self, taken: &Path) -> Result<String> {
        if self.ask_on_conflict {
            self.prompter.new_name(taken)
        } else {
            self.fixed.new_name(taken)
        }
    }

    fn confirm(&mut self, question: Question<'_>) -> Result<bool> {
        let ask = match question {
            Question::VerifyChecksum { .. } => self.ask_verify,
            Question::ProceedAfterFailedVerify { .. } => self.ask_proceed,
            Question::OverwriteChecksum(_) => self.ask_overwrite,
        };
        if ask {
            self.prompter.confirm(question)
        } else {
            self.fixed.confirm(question)
        }
    }
}
