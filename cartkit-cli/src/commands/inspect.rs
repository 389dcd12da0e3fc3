use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cartkit_core::util::{format_bytes, hex_bytes};
use cartkit_lib::CartridgeImage;

use crate::CliError;
use crate::commands::display_name;

/// Run the inspect command.
///
/// Files that cannot be read or have an invalid header are reported and
/// skipped; the command fails at the end if any were skipped.
pub(crate) fn run_inspect(files: &[PathBuf]) -> Result<(), CliError> {
    let mut failed = 0usize;

    for (i, path) in files.iter().enumerate() {
        if i > 0 {
            crate::log_blank();
        }
        let image = match CartridgeImage::open(path).and_then(CartridgeImage::require_valid) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("{}: {}", path.display(), e);
                failed += 1;
                continue;
            }
        };
        print_image(&image, path);
    }

    if failed > 0 {
        return Err(CliError::other(format!(
            "{} of {} file(s) could not be inspected",
            failed,
            files.len()
        )));
    }
    Ok(())
}

fn print_image(image: &CartridgeImage, path: &std::path::Path) {
    log::info!(
        "{}",
        display_name(path).if_supports_color(Stdout, |t| t.bold())
    );

    if let Some(format) = image.format() {
        log::info!(
            "  {} {} [{}]",
            "Format:".if_supports_color(Stdout, |t| t.cyan()),
            format.display_name(),
            hex_bytes(&image.magic()),
        );
    }

    let title = if image.internal_title().is_empty() {
        "(none)".to_string()
    } else {
        image.internal_title().to_string()
    };
    if image.is_known_title() {
        log::info!(
            "  {} {} {}",
            "Title: ".if_supports_color(Stdout, |t| t.cyan()),
            title,
            "(recognized)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  {} {}",
            "Title: ".if_supports_color(Stdout, |t| t.cyan()),
            title
        );
    }

    if image.normalized_title() != image.internal_title() {
        log::info!(
            "  {} {}",
            "Reads: ".if_supports_color(Stdout, |t| t.cyan()),
            image.normalized_title().if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    log::info!(
        "  {} {} ({} bytes)",
        "Size:  ".if_supports_color(Stdout, |t| t.cyan()),
        format_bytes(image.len() as u64),
        image.len(),
    );
    log::info!(
        "  {} {:08x}",
        "CRC32: ".if_supports_color(Stdout, |t| t.cyan()),
        crc32fast::hash(image.bytes()),
    );
}
