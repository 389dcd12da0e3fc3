use std::path::PathBuf;

use cartkit_core::CartridgeError;
use thiserror::Error;

/// Errors from launching the emulator or looking for its window.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The emulator executable could not be found on the search path
    #[error("Emulator executable not found: {executable} (is it installed?)")]
    ExecutableNotFound { executable: String },

    /// The emulator window did not appear within the polling budget
    #[error("Emulator window not found after {attempts} attempt(s)")]
    WindowNotFound { attempts: u32 },

    /// A window-manager query tool failed or produced unusable output
    #[error("Window query failed: {0}")]
    WindowQuery(String),

    /// I/O error while spawning or controlling the process
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LaunchError {
    pub fn executable_not_found(executable: impl Into<String>) -> Self {
        Self::ExecutableNotFound {
            executable: executable.into(),
        }
    }

    pub fn window_query(msg: impl Into<String>) -> Self {
        Self::WindowQuery(msg.into())
    }
}

/// Errors from the load/start/stop lifecycle.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Start or stop was requested before any image was loaded
    #[error("No ROM loaded")]
    NotLoaded,

    #[error(transparent)]
    Cartridge(#[from] CartridgeError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    /// Cleaning up the patched artifact failed
    #[error("Failed to remove {}: {source}", .path.display())]
    Cleanup {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors from reading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
