use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cartkit_core::patch::{diff_count, patch};
use cartkit_lib::settings;
use cartkit_lib::{CartridgeImage, PatchOptions};

use crate::CliError;

/// Apply command-line overrides on top of the configured patch options.
pub(crate) fn patch_options_with(
    base: PatchOptions,
    anomalies: Option<u32>,
    no_timing: bool,
    no_tone_shift: bool,
    seed: Option<u64>,
) -> PatchOptions {
    let mut options = base;
    if let Some(n) = anomalies {
        options = options.anomaly_count(n);
    }
    if no_timing {
        options = options.timing_adjust(false);
    }
    if no_tone_shift {
        options = options.tone_shift(false);
    }
    if let Some(s) = seed {
        options = options.seed(s);
    }
    options
}

/// Run the patch command: write `<file>.personalized` and leave `file` alone.
pub(crate) fn run_patch(
    file: &Path,
    anomalies: Option<u32>,
    no_timing: bool,
    no_tone_shift: bool,
    seed: Option<u64>,
) -> Result<(), CliError> {
    let settings = settings::load()?;
    let options = patch_options_with(
        settings.patch_options(),
        anomalies,
        no_timing,
        no_tone_shift,
        seed,
    );

    write_personalized(file, &options)?;
    Ok(())
}

/// Patch `file` with `options` and write the copy next to it.
pub(crate) fn write_personalized(file: &Path, options: &PatchOptions) -> Result<PathBuf, CliError> {
    let image = CartridgeImage::open(file)?.require_valid()?;
    if !image.is_known_title() {
        log::warn!(
            "\"{}\" is not a recognized title; patching anyway",
            image.internal_title()
        );
    }
    if options.is_identity() {
        log::warn!("All patches are disabled; the copy will match the original");
    }

    let mut patched = patch(&image, options)?;
    let target = patched.persist(file)?.to_path_buf();

    log::info!(
        "{} {}",
        "Wrote".if_supports_color(Stdout, |t| t.green()),
        target.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "  {} offset(s) touched, {} byte(s) changed",
        patched.touched().len(),
        diff_count(image.bytes(), patched.bytes()),
    );
    log::info!(
        "  CRC32 {:08x} -> {:08x}",
        crc32fast::hash(image.bytes()),
        crc32fast::hash(patched.bytes()),
    );
    Ok(target)
}
