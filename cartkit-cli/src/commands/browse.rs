use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cartkit_lib::settings;
use cartkit_lib::{list_roms, read_header};

use crate::CliError;

/// Run the browse command: list ROM files in the library directory.
pub(crate) fn run_browse(rom_dir: Option<PathBuf>) -> Result<(), CliError> {
    let settings = settings::load()?;
    let dir = settings::resolve_rom_dir(rom_dir, &settings);

    log::info!(
        "ROMs in {}",
        dir.display().if_supports_color(Stdout, |t| t.cyan())
    );
    crate::log_blank();

    let entries = list_roms(&dir)
        .map_err(|e| CliError::other(format!("Cannot read {}: {}", dir.display(), e)))?;

    if entries.is_empty() {
        log::info!(
            "{}",
            "No ROM files found (looking for .z64, .n64, .v64)"
                .if_supports_color(Stdout, |t| t.dimmed())
        );
        return Ok(());
    }

    let mut valid = 0usize;
    for entry in &entries {
        match read_header(&entry.path) {
            Ok(report) if report.is_valid() => {
                valid += 1;
                let format = report.format.map(|f| f.extension()).unwrap_or("?");
                let marker = if report.is_known_title() {
                    format!(" {}", "*".if_supports_color(Stdout, |t| t.green()))
                } else {
                    String::new()
                };
                log::info!(
                    "  {} {} [{}] {}{}",
                    "ok".if_supports_color(Stdout, |t| t.green()),
                    entry.name,
                    format,
                    report.internal_title.if_supports_color(Stdout, |t| t.dimmed()),
                    marker,
                );
            }
            Ok(_) => {
                log::info!(
                    "  {} {}",
                    "!!".if_supports_color(Stdout, |t| t.red()),
                    entry.name,
                );
            }
            Err(e) => log::warn!("{}: {}", entry.path.display(), e),
        }
    }

    crate::log_blank();
    log::info!("{} ROM file(s), {} with a valid header", entries.len(), valid);
    Ok(())
}
