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

//! Command-line entry point for Keepsake backups.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn, Level};

use keepsake::termui::{enable_tracing, TraceTimeStyle};
use keepsake::*;

use decisions::{CliDecisions, OnConflict, VerifyMode};

mod decisions;

#[derive(Debug, Parser)]
#[command(
    name = "keepsake",
    about = "A utility to create, verify, and restore backups locally",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Show debug trace on the terminal.
    #[arg(long, short = 'D', global = true)]
    debug: bool,

    /// Control timestamp prefixes on trace lines.
    #[arg(long, value_enum, global = true, default_value_t = TraceTimeStyle::None)]
    trace_time: TraceTimeStyle,

    /// Append a json formatted log to this file.
    #[arg(long, global = true)]
    log_json: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Pack a file or directory into a new numbered backup directory.
    Backup {
        /// File or directory to back up.
        target: PathBuf,
        /// Existing directory to hold the backup.
        destination: PathBuf,
        /// Compression level, 0 (plain tar) to 9.
        #[arg(long, short = 'z', default_value_t = CompressionLevel::default())]
        zip: CompressionLevel,
        /// Write a SHA-256 checksum file beside the archive.
        #[arg(long)]
        hash: bool,
        /// Store this text in note.txt beside the archive.
        #[arg(long, short)]
        note: Option<String>,
        /// Name the backup directory after this instead of the target.
        #[arg(long = "dir", short = 'd')]
        dir_name: Option<String>,
    },

    /// Extract a backup archive into a new "_restored" directory.
    Restore {
        /// Archive file to restore.
        archive: PathBuf,
        /// Directory to restore into.
        destination: PathBuf,
        /// What to do if the restore directory already exists.
        #[arg(long, value_enum, default_value_t = OnConflict::Ask)]
        on_conflict: OnConflict,
        /// Whether to verify checksums found beside the archive.
        #[arg(long, value_enum, default_value_t = VerifyMode::Ask)]
        verify: VerifyMode,
        /// Restore even if checksum verification fails.
        #[arg(long, short)]
        force: bool,
    },

    /// Check an archive against its checksum file.
    Verify {
        /// Checksum file written by a backup.
        checksum: PathBuf,
    },

    /// Write a checksum file for an existing archive.
    Hash {
        /// Archive file to hash.
        archive: PathBuf,
        /// Replace an existing checksum file without asking.
        #[arg(long, short)]
        force: bool,
    },
}

#[repr(u8)]
enum CommandExitCode {
    Ok = 0,
    VerifyFailed = 2,
    NotRestored = 3,
}

impl Command {
    fn run(&self) -> Result<CommandExitCode> {
        match self {
            Command::Backup {
                target,
                destination,
                zip,
                hash,
                note,
                dir_name,
            } => {
                let request = BackupRequest {
                    source: target.clone(),
                    destination: destination.clone(),
                    compression: *zip,
                    want_hash: *hash,
                    note: note.clone(),
                    container_name: dir_name.clone(),
                };
                create_backup(&request)?;
            }
            Command::Restore {
                archive,
                destination,
                on_conflict,
                verify,
                force,
            } => {
                let mut decisions = CliDecisions::for_restore(*on_conflict, *verify, *force);
                match restore(archive, destination, &mut decisions)? {
                    RestoreOutcome::Restored { .. } => (),
                    RestoreOutcome::Declined { .. } => {
                        info!("Nothing restored.");
                        return Ok(CommandExitCode::NotRestored);
                    }
                    RestoreOutcome::Aborted { .. } => {
                        warn!("Restore aborted: archive failed verification.");
                        return Ok(CommandExitCode::NotRestored);
                    }
                }
            }
            Command::Verify { checksum } => {
                if !keepsake::verify(checksum) {
                    return Ok(CommandExitCode::VerifyFailed);
                }
            }
            Command::Hash { archive, force } => {
                let mut decisions = CliDecisions::for_hash(*force);
                if let Some(written) = hash_archive(archive, &mut decisions)? {
                    info!("Hash created at {written:?}");
                }
            }
        }
        Ok(CommandExitCode::Ok)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let console_level = if args.debug {
        Level::TRACE
    } else {
        Level::INFO
    };
    let _flush_guard = match enable_tracing(args.trace_time, console_level, args.log_json.as_deref())
    {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Failed to initialize log system: {err}");
            return ExitCode::from(4);
        }
    };
    match args.command.run() {
        Err(ref e) => {
            error!("{e}");
            let mut cause: &dyn Error = e;
            while let Some(c) = cause.source() {
                error!("  caused by: {c}");
                cause = c;
            }
            ExitCode::FAILURE
        }
        Ok(code) => ExitCode::from(code as u8),
    }
}

#[test]
fn verify_clap() {
    use clap::CommandFactory;
    Args::command().debug_assert()
}
