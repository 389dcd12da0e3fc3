//! Library browsing, settings, and the emulator session built on
//! [`cartkit_core`].

pub mod browser;
pub mod embed;
pub mod error;
pub mod launcher;
pub mod session;
pub mod settings;

pub use browser::{RomEntry, list_roms, read_header};
pub use embed::{NullEmbedder, WindowEmbedder, WindowId, X11Embedder, default_embedder};
pub use error::{LaunchError, SessionError, SettingsError};
pub use launcher::{
    DisplayMode, EmulatorCommand, LaunchOptions, LaunchProgress, Launched, PollPolicy,
};
pub use session::{LoadedRom, PatchArtifact, Session};
pub use settings::Settings;

// Re-export core types so dependents only need this crate
pub use cartkit_core::{
    CartridgeError, CartridgeImage, HeaderReport, N64Format, PatchOptions, PatchedImage,
};
