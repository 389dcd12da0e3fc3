//! Console logger for the CLI.
//!
//! `info` and below go to stdout so they can be piped; warnings and errors
//! go to stderr. With `--logfile` every line is also appended to a file with
//! ANSI escapes removed.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::{Level, LevelFilter, Metadata, Record};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use crate::CliError;

/// Crates whose records are shown. Everything else is dropped.
const TARGET_PREFIX: &str = "cartkit";

pub(crate) struct CliLogger {
    level: LevelFilter,
    timestamps: bool,
    file: Option<Mutex<File>>,
}

/// Level for the `--quiet` / `--verbose` flags.
pub(crate) fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

/// Install the logger. Must be called once, before any command runs.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let file = match logfile {
        Some(path) => {
            let f = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    CliError::logging(format!("Cannot open {}: {}", path.display(), e))
                })?;
            Some(Mutex::new(f))
        }
        None => None,
    };

    let level = level_for(quiet, verbose);
    let logger = CliLogger {
        level,
        timestamps: verbose,
        file,
    };
    log::set_boxed_logger(Box::new(logger))
        .map(|()| log::set_max_level(level))
        .map_err(|e| CliError::logging(e.to_string()))
}

/// Print an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}

/// Render one record. Warnings and errors get a colored prefix.
pub(crate) fn render(level: Level, message: &str, timestamp: Option<&str>) -> String {
    let prefix = match level {
        Level::Error => format!("{} ", "error:".if_supports_color(Stderr, |t| t.red())),
        Level::Warn => format!("{} ", "warning:".if_supports_color(Stderr, |t| t.yellow())),
        _ => String::new(),
    };
    match timestamp {
        Some(ts) => format!("{ts} {level:<5} {prefix}{message}"),
        None => format!("{prefix}{message}"),
    }
}

impl log::Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.target().starts_with(TARGET_PREFIX)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = self
            .timestamps
            .then(|| chrono::Local::now().format("%H:%M:%S%.3f").to_string());
        let line = render(
            record.level(),
            &record.args().to_string(),
            timestamp.as_deref(),
        );

        if record.level() <= Level::Warn {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }

        if let Some(file) = &self.file {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{}", strip_ansi_escapes::strip_str(&line));
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut f) = file.lock() {
                let _ = f.flush();
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/logging_tests.rs"]
mod tests;
