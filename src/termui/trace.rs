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

//! Send `tracing` events to the terminal and optionally a JSON log file.
//!
//! Warnings and errors go to stderr; everything else to stdout.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::Layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::Registry;

/// Chosen style of timestamp prefix on trace lines.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TraceTimeStyle {
    /// No timestamp on trace lines.
    #[default]
    None,
    /// Universal time, in RFC 3339 style.
    Utc,
    /// Local time, in RFC 3339, using the offset when the program starts.
    Local,
    /// Time since the start of the process, in seconds.
    Relative,
}

/// Install the global subscriber.
///
/// The returned guard flushes the JSON log when dropped, so keep it until
/// the program exits.
#[must_use = "dropping the guard stops the JSON log"]
pub fn enable_tracing(
    time_style: TraceTimeStyle,
    console_level: Level,
    json_path: Option<&Path>,
) -> io::Result<Option<WorkerGuard>> {
    use tracing_subscriber::fmt::time;

    fn hookup<FT>(
        timer: FT,
        console_level: Level,
        json_path: Option<&Path>,
    ) -> io::Result<Option<WorkerGuard>>
    where
        FT: FormatTime + Send + Sync + 'static,
    {
        let console_layer = tracing_subscriber::fmt::Layer::default()
            .with_ansi(clicolors_control::colors_enabled())
            .with_target(false)
            .with_writer(
                io::stderr
                    .with_max_level(Level::WARN)
                    .or_else(io::stdout),
            )
            .with_timer(timer)
            .with_filter(filter::Targets::new().with_target("keepsake", console_level));
        let (json_layer, flush_guard) = match json_path {
            Some(json_path) => {
                let file_writer = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(json_path)?;
                let (non_blocking, guard) = tracing_appender::non_blocking(file_writer);
                let layer = tracing_subscriber::fmt::Layer::default()
                    .json()
                    .with_writer(non_blocking);
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };
        Registry::default()
            .with(console_layer)
            .with(json_layer)
            .try_init()
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        Ok(flush_guard)
    }

    let flush_guard = match time_style {
        TraceTimeStyle::None => hookup((), console_level, json_path),
        TraceTimeStyle::Utc => hookup(time::UtcTime::rfc_3339(), console_level, json_path),
        TraceTimeStyle::Relative => hookup(time::uptime(), console_level, json_path),
        TraceTimeStyle::Local => {
            // Falls back to UTC if the local offset can't be determined,
            // as happens in multithreaded processes on some platforms.
            let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
            hookup(
                time::OffsetTime::new(offset, Rfc3339),
                console_level,
                json_path,
            )
        }
    }?;
    trace!("Tracing enabled");
    Ok(flush_guard)
}
