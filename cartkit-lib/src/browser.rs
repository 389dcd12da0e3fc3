//! ROM directory browsing.
//!
//! Lists a single directory (no recursion) and keeps regular files whose
//! extension is one of the recognized cartridge extensions. Entries come
//! back in directory listing order.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use cartkit_core::cartridge::{TITLE_LEN, TITLE_OFFSET};
use cartkit_core::{HeaderReport, ROM_EXTENSIONS, validate};

/// A ROM file found while browsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomEntry {
    /// File name as listed (e.g., "Super Mario 64 (USA).z64").
    pub name: String,
    /// Full path to the file.
    pub path: PathBuf,
}

/// Check if a path has one of the recognized extensions (case-insensitive).
pub fn has_rom_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ROM_EXTENSIONS.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// List the ROM files directly inside `dir`.
///
/// Unreadable entries and names that aren't valid UTF-8 are skipped; failing
/// to open `dir` itself is an error.
pub fn list_roms(dir: &Path) -> io::Result<Vec<RomEntry>> {
    let mut roms = Vec::new();
    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if !path.is_file() || !has_rom_extension(&path) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            log::debug!("Skipping non-UTF-8 file name: {}", path.display());
            continue;
        };
        roms.push(RomEntry {
            name: name.to_string(),
            path,
        });
    }
    Ok(roms)
}

/// Validate a file by reading only its header window.
pub fn read_header(path: &Path) -> io::Result<HeaderReport> {
    let file = File::open(path)?;
    let mut buf = Vec::with_capacity(TITLE_OFFSET + TITLE_LEN);
    file.take((TITLE_OFFSET + TITLE_LEN) as u64)
        .read_to_end(&mut buf)?;
    Ok(validate(&buf))
}

#[cfg(test)]
#[path = "tests/browser_tests.rs"]
mod tests;
