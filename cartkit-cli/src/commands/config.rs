use std::fs;
use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cartkit_lib::settings;

use crate::CliError;

/// Show current settings and where they come from.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings::settings_path();
    let current = settings::load_from(&path)?;

    log::info!(
        "{}",
        "cartkit Configuration".if_supports_color(Stdout, |t| t.bold())
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    for line in settings::to_display_string(&current)?.lines() {
        log::info!("  {}", line);
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    log::info!("{}", settings::settings_path().display());
    Ok(())
}

/// Store `dir` as the ROM library directory.
pub(crate) fn run_config_set_rom_dir(dir: &Path) -> Result<(), CliError> {
    if !dir.is_dir() {
        return Err(CliError::config(format!(
            "Not a directory: {}",
            dir.display()
        )));
    }
    let dir = fs::canonicalize(dir)?;

    let mut current = settings::load()?;
    current.library.rom_dir = Some(dir.clone());
    settings::save(&current)?;

    log::info!(
        "ROM directory set to {}",
        dir.display().if_supports_color(Stdout, |t| t.cyan())
    );
    Ok(())
}

/// Remove the ROM library directory from the settings.
pub(crate) fn run_config_clear_rom_dir() -> Result<(), CliError> {
    let mut current = settings::load()?;
    if current.library.rom_dir.take().is_none() {
        log::info!("No ROM directory configured");
        return Ok(());
    }
    settings::save(&current)?;
    log::info!("ROM directory cleared; browsing the current directory");
    Ok(())
}
