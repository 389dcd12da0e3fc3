//! Persistent application settings.
//!
//! The settings file lives at `~/.config/cartkit/settings.toml` (or the
//! platform equivalent). Every key is optional; anything missing falls back
//! to its default. A file that exists but does not parse is an error rather
//! than being silently replaced.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cartkit_core::PatchOptions;
use cartkit_core::patch::DEFAULT_ANOMALY_COUNT;
use serde::{Deserialize, Serialize};

use crate::SettingsError;
use crate::launcher::{
    DEFAULT_EXECUTABLE, DEFAULT_WINDOW_TITLE, EmulatorCommand, HIGH_FRAME_RATE_ARGS,
    LaunchOptions, NO_SPEED_LIMIT_FLAG, PollPolicy,
};

/// All user-configurable settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub emulator: EmulatorSettings,
    pub patch: PatchSettings,
    pub launch: LaunchSettings,
}

/// `[library]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Directory browsed for ROM files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rom_dir: Option<PathBuf>,
}

/// `[emulator]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorSettings {
    pub executable: String,
    /// Substring matched against top-level window names when embedding.
    pub window_title: String,
    pub base_args: Vec<String>,
    /// Extra arguments passed when the high frame rate option is on.
    pub high_frame_rate_args: Vec<String>,
}

impl Default for EmulatorSettings {
    fn default() -> Self {
        Self {
            executable: DEFAULT_EXECUTABLE.to_string(),
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            base_args: vec![NO_SPEED_LIMIT_FLAG.to_string()],
            high_frame_rate_args: HIGH_FRAME_RATE_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// `[patch]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchSettings {
    /// Patch recognized titles on load.
    pub personalize: bool,
    pub anomaly_count: u32,
    pub timing_adjust: bool,
    pub tone_shift: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for PatchSettings {
    fn default() -> Self {
        Self {
            personalize: true,
            anomaly_count: DEFAULT_ANOMALY_COUNT,
            timing_adjust: true,
            tone_shift: true,
            seed: None,
        }
    }
}

/// `[launch]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchSettings {
    pub high_frame_rate: bool,
    pub embed: bool,
    pub poll_attempts: u32,
    pub poll_interval_ms: u64,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        let poll = PollPolicy::default();
        Self {
            high_frame_rate: false,
            embed: false,
            poll_attempts: poll.attempts,
            poll_interval_ms: poll.interval.as_millis() as u64,
        }
    }
}

impl Settings {
    /// Patch options derived from `[patch]`.
    pub fn patch_options(&self) -> PatchOptions {
        PatchOptions {
            anomaly_count: self.patch.anomaly_count,
            timing_adjust: self.patch.timing_adjust,
            tone_shift: self.patch.tone_shift,
            seed: self.patch.seed,
        }
    }

    /// Launch options derived from `[launch]`.
    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            high_frame_rate: self.launch.high_frame_rate,
            embed: self.launch.embed,
            poll: PollPolicy {
                attempts: self.launch.poll_attempts,
                interval: Duration::from_millis(self.launch.poll_interval_ms),
            },
        }
    }

    /// Emulator invocation derived from `[emulator]`.
    pub fn emulator_command(&self) -> EmulatorCommand {
        EmulatorCommand {
            executable: self.emulator.executable.clone(),
            window_title: self.emulator.window_title.clone(),
            base_args: self.emulator.base_args.clone(),
            high_frame_rate_args: self.emulator.high_frame_rate_args.clone(),
        }
    }
}

/// Canonical path to the settings file: `~/.config/cartkit/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("cartkit").join("settings.toml")
}

/// Load settings from the canonical path.
pub fn load() -> Result<Settings, SettingsError> {
    load_from(&settings_path())
}

/// Load settings from `path`. A missing file yields the defaults.
pub fn load_from(path: &Path) -> Result<Settings, SettingsError> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No settings at {}, using defaults", path.display());
            return Ok(Settings::default());
        }
        Err(e) => return Err(e.into()),
    };
    Ok(toml::from_str(&contents)?)
}

/// Save settings to the canonical path.
pub fn save(settings: &Settings) -> Result<(), SettingsError> {
    save_to(&settings_path(), settings)
}

/// Save settings to `path`, creating parent directories as needed.
pub fn save_to(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(settings)?;

    // Write atomically
    let tmp = path.with_extension("toml.tmp");
    fs::write(&tmp, &serialized)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Resolve the ROM directory using a priority chain:
///
/// 1. CLI override (if `Some`)
/// 2. Saved `library.rom_dir`
/// 3. Current working directory
pub fn resolve_rom_dir(cli_override: Option<PathBuf>, settings: &Settings) -> PathBuf {
    if let Some(p) = cli_override {
        return p;
    }
    if let Some(p) = settings.library.rom_dir.as_ref().filter(|p| !p.as_os_str().is_empty()) {
        return p.clone();
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Render settings as TOML for display.
pub fn to_display_string(settings: &Settings) -> Result<String, SettingsError> {
    Ok(toml::to_string_pretty(settings)?)
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
