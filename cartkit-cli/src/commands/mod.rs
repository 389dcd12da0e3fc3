pub(crate) mod browse;
pub(crate) mod config;
pub(crate) mod inspect;
pub(crate) mod launch;
pub(crate) mod patch;

use std::path::Path;

/// File name for display, falling back to the full path.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
#[path = "../tests/commands_tests.rs"]
mod tests;
